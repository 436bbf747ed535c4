//! Gallery endpoints

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
    models::{gallery::GalleryForm, page::CategoryQuery, EntityPatch, GalleryImage, ListFilter},
};

use super::{AdminUser, UploadForm};

/// Multipart body of a gallery upload; one row is created per file
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct GalleryUpload {
    category: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
    /// Image files, sent as repeated `files` parts
    #[schema(value_type = Vec<String>)]
    files: Vec<Vec<u8>>,
}

/// Active gallery images, optionally of one category
#[utoipa::path(
    get,
    path = "/gallery",
    tag = "gallery",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Gallery images", body = Vec<GalleryImage>)
    )
)]
pub async fn public_list(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<GalleryImage>>> {
    let images = state
        .services
        .catalog
        .gallery
        .list(&ListFilter::category(query.category))
        .await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/admin/gallery",
    tag = "gallery",
    security(("bearer_auth" = [])),
    params(ListFilter),
    responses(
        (status = 200, description = "Gallery images", body = Vec<GalleryImage>)
    )
)]
pub async fn admin_list(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<GalleryImage>>> {
    let images = state.services.catalog.gallery.list(&filter).await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/admin/gallery/{id}",
    tag = "gallery",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Gallery image", body = GalleryImage),
        (status = 404, description = "Image not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<GalleryImage>> {
    let image = state.services.catalog.gallery.get(id).await?;
    Ok(Json(image))
}

/// Upload one or more images
#[utoipa::path(
    post,
    path = "/admin/gallery",
    tag = "gallery",
    security(("bearer_auth" = [])),
    request_body(content = GalleryUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Images uploaded", body = Vec<GalleryImage>),
        (status = 400, description = "No image or unsupported file", body = crate::error::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<GalleryImage>>)> {
    let upload = UploadForm::read(multipart).await?;
    let form = GalleryForm {
        category: upload.optional("category"),
        sort_order: upload.number("sort_order")?,
        is_active: upload.flag("is_active", true),
    };
    let images = state.services.catalog.gallery.create_many(form, upload.files).await?;
    Ok((StatusCode::CREATED, Json(images)))
}

#[utoipa::path(
    put,
    path = "/admin/gallery/{id}",
    tag = "gallery",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body = GalleryForm,
    responses(
        (status = 200, description = "Image updated", body = GalleryImage)
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(form): Json<GalleryForm>,
) -> AppResult<Json<GalleryImage>> {
    let image = state.services.catalog.gallery.update(id, form).await?;
    Ok(Json(image))
}

#[utoipa::path(
    patch,
    path = "/admin/gallery/{id}",
    tag = "gallery",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body = EntityPatch,
    responses(
        (status = 200, description = "Image updated", body = GalleryImage)
    )
)]
pub async fn patch(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntityPatch>,
) -> AppResult<Json<GalleryImage>> {
    let image = state.services.catalog.gallery.patch(id, patch).await?;
    Ok(Json(image))
}

/// Delete an image and its stored file
#[utoipa::path(
    delete,
    path = "/admin/gallery/{id}",
    tag = "gallery",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 422, description = "Missing storage path. Cannot delete file.", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.gallery.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
