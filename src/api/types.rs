//! Photography type endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{photography_type::TypeForm, Category, EntityPatch, ListFilter, PhotographyType},
};

use super::AdminUser;

/// Categories offered to visitors (configured defaults when no type is active)
#[utoipa::path(
    get,
    path = "/types",
    tag = "types",
    responses(
        (status = 200, description = "Categories", body = Vec<Category>)
    )
)]
pub async fn public_list(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.settings.categories().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/admin/types",
    tag = "types",
    security(("bearer_auth" = [])),
    params(ListFilter),
    responses(
        (status = 200, description = "Photography types", body = Vec<PhotographyType>)
    )
)]
pub async fn admin_list(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<PhotographyType>>> {
    let types = state.services.catalog.types.list(&filter).await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/admin/types/{id}",
    tag = "types",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Type ID")),
    responses(
        (status = 200, description = "Photography type", body = PhotographyType),
        (status = 404, description = "Type not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PhotographyType>> {
    let kind = state.services.catalog.types.get(id).await?;
    Ok(Json(kind))
}

/// Create a type; the slug is derived from the name when left empty
#[utoipa::path(
    post,
    path = "/admin/types",
    tag = "types",
    security(("bearer_auth" = [])),
    request_body = TypeForm,
    responses(
        (status = 201, description = "Type created", body = PhotographyType),
        (status = 409, description = "Slug already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Json(form): Json<TypeForm>,
) -> AppResult<(StatusCode, Json<PhotographyType>)> {
    let kind = state.services.catalog.types.create(form).await?;
    Ok((StatusCode::CREATED, Json(kind)))
}

#[utoipa::path(
    put,
    path = "/admin/types/{id}",
    tag = "types",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Type ID")),
    request_body = TypeForm,
    responses(
        (status = 200, description = "Type updated", body = PhotographyType)
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(form): Json<TypeForm>,
) -> AppResult<Json<PhotographyType>> {
    let kind = state.services.catalog.types.update(id, form).await?;
    Ok(Json(kind))
}

#[utoipa::path(
    patch,
    path = "/admin/types/{id}",
    tag = "types",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Type ID")),
    request_body = EntityPatch,
    responses(
        (status = 200, description = "Type updated", body = PhotographyType)
    )
)]
pub async fn patch(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntityPatch>,
) -> AppResult<Json<PhotographyType>> {
    let kind = state.services.catalog.types.patch(id, patch).await?;
    Ok(Json(kind))
}

#[utoipa::path(
    delete,
    path = "/admin/types/{id}",
    tag = "types",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Type ID")),
    responses(
        (status = 204, description = "Type deleted")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.types.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
