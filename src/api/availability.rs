//! Admin availability calendar endpoints
//!
//! Edits are kept in a draft tied to the caller's session until saved.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    calendar::{parse_date, Month},
    error::AppResult,
    models::availability::{AdminMonthView, DiscardMonthRequest, MonthQuery, SaveResponse, ToggleDayRequest},
    services::availability::DraftKey,
};

use super::AdminUser;

/// Month from `?month=YYYY-MM`, the current month when absent
pub(crate) fn month_param(month: Option<&str>) -> AppResult<Month> {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => Ok(m.parse()?),
        None => Ok(Month::current()),
    }
}

/// Load a month into the draft
#[utoipa::path(
    get,
    path = "/admin/availability",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(MonthQuery),
    responses(
        (status = 200, description = "Month grid with draft state", body = AdminMonthView),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_month(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<AdminMonthView>> {
    let month = month_param(query.month.as_deref())?;
    let view = state.services.availability.load_month(DraftKey::from(&claims), month, false).await?;
    Ok(Json(view))
}

/// Toggle one date between booked and available in the draft
#[utoipa::path(
    post,
    path = "/admin/availability/toggle",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = ToggleDayRequest,
    responses(
        (status = 200, description = "Month grid after the toggle", body = AdminMonthView)
    )
)]
pub async fn toggle_day(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    Json(request): Json<ToggleDayRequest>,
) -> AppResult<Json<AdminMonthView>> {
    let date = parse_date(&request.date)?;
    let view = state.services.availability.toggle(DraftKey::from(&claims), date).await?;
    Ok(Json(view))
}

/// Save the draft
#[utoipa::path(
    post,
    path = "/admin/availability/save",
    tag = "availability",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved, or nothing to save", body = SaveResponse),
        (status = 409, description = "A save is already in progress", body = crate::error::ErrorResponse),
        (status = 502, description = "Backend failure; `committed` lists dates already written", body = crate::error::ErrorResponse)
    )
)]
pub async fn save(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
) -> AppResult<Json<SaveResponse>> {
    let response = state.services.availability.save(DraftKey::from(&claims)).await?;
    Ok(Json(response))
}

/// Discard unsaved edits of one month
#[utoipa::path(
    post,
    path = "/admin/availability/discard",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = DiscardMonthRequest,
    responses(
        (status = 200, description = "Month grid reloaded from the store", body = AdminMonthView)
    )
)]
pub async fn discard_month(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    Json(request): Json<DiscardMonthRequest>,
) -> AppResult<Json<AdminMonthView>> {
    let month: Month = request.month.parse()?;
    let view = state.services.availability.discard(DraftKey::from(&claims), month).await?;
    Ok(Json(view))
}
