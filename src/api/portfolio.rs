//! Portfolio endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{page::CategoryQuery, portfolio::PortfolioForm, EntityPatch, ListFilter, PortfolioPhoto},
};

use super::{AdminUser, UploadForm};

/// Multipart body of a portfolio upload
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PortfolioUpload {
    category: String,
    title: String,
    alt: String,
    sort_order: Option<i32>,
    is_active: Option<bool>,
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Active portfolio photos, optionally of one category
#[utoipa::path(
    get,
    path = "/portfolio",
    tag = "portfolio",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Portfolio photos", body = Vec<PortfolioPhoto>)
    )
)]
pub async fn public_list(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<PortfolioPhoto>>> {
    let photos = state
        .services
        .catalog
        .portfolio
        .list(&ListFilter::category(query.category))
        .await?;
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/admin/portfolio",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    params(ListFilter),
    responses(
        (status = 200, description = "Portfolio photos", body = Vec<PortfolioPhoto>)
    )
)]
pub async fn admin_list(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<PortfolioPhoto>>> {
    let photos = state.services.catalog.portfolio.list(&filter).await?;
    Ok(Json(photos))
}

#[utoipa::path(
    get,
    path = "/admin/portfolio/{id}",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Portfolio photo", body = PortfolioPhoto),
        (status = 404, description = "Photo not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PortfolioPhoto>> {
    let photo = state.services.catalog.portfolio.get(id).await?;
    Ok(Json(photo))
}

/// Upload a photo with its category, title and alt text
#[utoipa::path(
    post,
    path = "/admin/portfolio",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    request_body(content = PortfolioUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo uploaded", body = PortfolioPhoto),
        (status = 400, description = "Missing fields or image", body = crate::error::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<PortfolioPhoto>)> {
    let upload = UploadForm::read(multipart).await?;
    let form = PortfolioForm {
        category: upload.text("category"),
        title: upload.text("title"),
        alt: upload.text("alt"),
        sort_order: upload.number("sort_order")?,
        is_active: upload.flag("is_active", true),
    };
    let file = upload.single_file()?;
    let photo = state.services.catalog.portfolio.create_with_image(form, file).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

#[utoipa::path(
    put,
    path = "/admin/portfolio/{id}",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = PortfolioForm,
    responses(
        (status = 200, description = "Photo updated", body = PortfolioPhoto)
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(form): Json<PortfolioForm>,
) -> AppResult<Json<PortfolioPhoto>> {
    let photo = state.services.catalog.portfolio.update(id, form).await?;
    Ok(Json(photo))
}

#[utoipa::path(
    patch,
    path = "/admin/portfolio/{id}",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = EntityPatch,
    responses(
        (status = 200, description = "Photo updated", body = PortfolioPhoto)
    )
)]
pub async fn patch(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntityPatch>,
) -> AppResult<Json<PortfolioPhoto>> {
    let photo = state.services.catalog.portfolio.patch(id, patch).await?;
    Ok(Json(photo))
}

/// Delete a photo and its stored file
#[utoipa::path(
    delete,
    path = "/admin/portfolio/{id}",
    tag = "portfolio",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 422, description = "Missing storage path. Cannot delete file.", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.portfolio.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
