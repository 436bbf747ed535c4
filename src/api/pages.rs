//! Aggregated public page payloads and the sitemap

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppResult,
    models::page::{CategoryQuery, GalleryPage, HomePage, ServiceDetailPage, ServicesPage},
};

#[utoipa::path(
    get,
    path = "/pages/home",
    tag = "pages",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Home page", body = HomePage)
    )
)]
pub async fn home(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<HomePage>> {
    let page = state.services.pages.home(query.category).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/pages/services",
    tag = "pages",
    responses(
        (status = 200, description = "Services overview", body = ServicesPage)
    )
)]
pub async fn services(State(state): State<crate::AppState>) -> AppResult<Json<ServicesPage>> {
    let page = state.services.pages.services().await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/pages/services/{slug}",
    tag = "pages",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Service detail", body = ServiceDetailPage),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse)
    )
)]
pub async fn service_detail(
    State(state): State<crate::AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ServiceDetailPage>> {
    let page = state.services.pages.service_detail(&slug).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/pages/gallery",
    tag = "pages",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Gallery page", body = GalleryPage)
    )
)]
pub async fn gallery(
    State(state): State<crate::AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<GalleryPage>> {
    let page = state.services.pages.gallery(query.category).await?;
    Ok(Json(page))
}

/// Served at the site root, outside the API prefix
pub async fn sitemap(State(state): State<crate::AppState>) -> AppResult<impl IntoResponse> {
    let xml = state.services.pages.sitemap().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}
