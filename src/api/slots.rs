//! Availability slot endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::availability::{AvailabilitySlot, CreateSlot, MonthQuery, UpdateSlot},
};

use super::{availability::month_param, AdminUser};

/// List the slots of a month
#[utoipa::path(
    get,
    path = "/admin/slots",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(MonthQuery),
    responses(
        (status = 200, description = "Slots ordered by date, full day first, then time", body = Vec<AvailabilitySlot>)
    )
)]
pub async fn list_slots(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<AvailabilitySlot>>> {
    let month = month_param(query.month.as_deref())?;
    let slots = state.services.availability.list_slots(month).await?;
    Ok(Json(slots))
}

/// Create a slot
#[utoipa::path(
    post,
    path = "/admin/slots",
    tag = "slots",
    security(("bearer_auth" = [])),
    request_body = CreateSlot,
    responses(
        (status = 201, description = "Slot created", body = AvailabilitySlot),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "This slot already exists for that date and time.", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_slot(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Json(data): Json<CreateSlot>,
) -> AppResult<(StatusCode, Json<AvailabilitySlot>)> {
    let slot = state.services.availability.create_slot(data).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Update a slot's status, service type or note
#[utoipa::path(
    put,
    path = "/admin/slots/{id}",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = UpdateSlot,
    responses(
        (status = 200, description = "Slot updated", body = AvailabilitySlot),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_slot(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateSlot>,
) -> AppResult<Json<AvailabilitySlot>> {
    let slot = state.services.availability.update_slot(id, data).await?;
    Ok(Json(slot))
}

/// Delete a slot
#[utoipa::path(
    delete,
    path = "/admin/slots/{id}",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 204, description = "Slot deleted"),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_slot(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.availability.delete_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
