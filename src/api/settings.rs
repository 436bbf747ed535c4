//! Site settings endpoints

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::settings::{SiteAsset, SiteSettings, UpdateSettings},
};

use super::{AdminUser, UploadForm};

/// Multipart body of a logo or banner upload
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AssetUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Public branding and contact settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = SiteSettings)
    )
)]
pub async fn get_public(State(state): State<crate::AppState>) -> AppResult<Json<SiteSettings>> {
    let settings = state.services.settings.get().await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = SiteSettings)
    )
)]
pub async fn admin_get(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
) -> AppResult<Json<SiteSettings>> {
    let settings = state.services.settings.get().await?;
    Ok(Json(settings))
}

/// Replace the editable settings
#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = SiteSettings),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<SiteSettings>> {
    let settings = state.services.settings.update(request).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    post,
    path = "/admin/settings/logo",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body(content = AssetUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo replaced", body = SiteSettings),
        (status = 400, description = "No image or unsupported file", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_logo(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> AppResult<Json<SiteSettings>> {
    let file = UploadForm::read(multipart).await?.single_file()?;
    let settings = state.services.settings.upload_asset(SiteAsset::Logo, file).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    post,
    path = "/admin/settings/banner",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body(content = AssetUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Banner replaced", body = SiteSettings),
        (status = 400, description = "No image or unsupported file", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_banner(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> AppResult<Json<SiteSettings>> {
    let file = UploadForm::read(multipart).await?.single_file()?;
    let settings = state.services.settings.upload_asset(SiteAsset::Banner, file).await?;
    Ok(Json(settings))
}
