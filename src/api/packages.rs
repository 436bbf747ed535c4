//! Package endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{package::PackageForm, page::CategoryQuery, EntityPatch, ListFilter, Package},
};

use super::AdminUser;

/// Active packages, optionally of one category
#[utoipa::path(
    get,
    path = "/packages",
    tag = "packages",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Packages ordered by sort order", body = Vec<Package>)
    )
)]
pub async fn public_list(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Package>>> {
    let packages = state
        .services
        .catalog
        .packages
        .list(&ListFilter::category(query.category))
        .await?;
    Ok(Json(packages))
}

/// All packages, including inactive ones
#[utoipa::path(
    get,
    path = "/admin/packages",
    tag = "packages",
    security(("bearer_auth" = [])),
    params(ListFilter),
    responses(
        (status = 200, description = "Packages", body = Vec<Package>)
    )
)]
pub async fn admin_list(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<Package>>> {
    let packages = state.services.catalog.packages.list(&filter).await?;
    Ok(Json(packages))
}

#[utoipa::path(
    get,
    path = "/admin/packages/{id}",
    tag = "packages",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Package ID")),
    responses(
        (status = 200, description = "Package", body = Package),
        (status = 404, description = "Package not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Package>> {
    let package = state.services.catalog.packages.get(id).await?;
    Ok(Json(package))
}

#[utoipa::path(
    post,
    path = "/admin/packages",
    tag = "packages",
    security(("bearer_auth" = [])),
    request_body = PackageForm,
    responses(
        (status = 201, description = "Package created", body = Package),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Json(form): Json<PackageForm>,
) -> AppResult<(StatusCode, Json<Package>)> {
    let package = state.services.catalog.packages.create(form).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

#[utoipa::path(
    put,
    path = "/admin/packages/{id}",
    tag = "packages",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Package ID")),
    request_body = PackageForm,
    responses(
        (status = 200, description = "Package updated", body = Package)
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(form): Json<PackageForm>,
) -> AppResult<Json<Package>> {
    let package = state.services.catalog.packages.update(id, form).await?;
    Ok(Json(package))
}

/// Toggle active or change sort order
#[utoipa::path(
    patch,
    path = "/admin/packages/{id}",
    tag = "packages",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Package ID")),
    request_body = EntityPatch,
    responses(
        (status = 200, description = "Package updated", body = Package)
    )
)]
pub async fn patch(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntityPatch>,
) -> AppResult<Json<Package>> {
    let package = state.services.catalog.packages.patch(id, patch).await?;
    Ok(Json(package))
}

#[utoipa::path(
    delete,
    path = "/admin/packages/{id}",
    tag = "packages",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Package ID")),
    responses(
        (status = 204, description = "Package deleted")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.packages.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
