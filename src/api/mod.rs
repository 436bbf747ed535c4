//! API handlers for the studio REST endpoints

pub mod auth;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod gallery;
pub mod health;
pub mod openapi;
pub mod packages;
pub mod pages;
pub mod portfolio;
pub mod settings;
pub mod slots;
pub mod types;

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use axum_extra::extract::Multipart;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::StorageKind,
    error::{AppError, AppResult},
    models::{admin::SessionClaims, Upload},
    services::media::MAX_IMAGE_SIZE,
    storage::PUBLIC_PREFIX,
    AppState,
};

/// Request body limit on upload routes (several images per request)
const UPLOAD_BODY_LIMIT: usize = 5 * MAX_IMAGE_SIZE;

/// Extractor for a signed-in session from the bearer token
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = state.services.auth.session(token.trim()).await?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for a signed-in session whose account is an admin
pub struct AdminUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !state.services.auth.is_admin(claims.sub).await? {
            return Err(AppError::Authorization("Admin access required".to_string()));
        }
        Ok(AdminUser(claims))
    }
}

/// Text fields and files of a multipart upload
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<Upload>,
}

impl UploadForm {
    /// Read every part; parts with a file name are files, the rest text
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                    form.files.push(Upload {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn number(&self, name: &str) -> AppResult<i32> {
        match self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
            Some(v) => v
                .parse()
                .map_err(|_| AppError::Validation(format!("{} must be a number", name))),
            None => Ok(0),
        }
    }

    /// Checkbox-style flag; absent means `default`
    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.fields.get(name).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) => matches!(v.as_str(), "true" | "1" | "on" | "yes"),
            None => default,
        }
    }

    /// The single uploaded file
    pub fn single_file(mut self) -> AppResult<Upload> {
        if self.files.is_empty() {
            return Err(AppError::Validation("Please choose an image file.".to_string()));
        }
        Ok(self.files.swap_remove(0))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        // Availability draft
        .route("/availability", get(availability::get_month))
        .route("/availability/toggle", post(availability::toggle_day))
        .route("/availability/save", post(availability::save))
        .route("/availability/discard", post(availability::discard_month))
        // Availability slots
        .route("/slots", get(slots::list_slots).post(slots::create_slot))
        .route("/slots/:id", put(slots::update_slot).delete(slots::delete_slot))
        // Gallery
        .route("/gallery", get(gallery::admin_list).post(gallery::create))
        .route(
            "/gallery/:id",
            get(gallery::get_one)
                .put(gallery::update)
                .patch(gallery::patch)
                .delete(gallery::delete),
        )
        // Portfolio
        .route("/portfolio", get(portfolio::admin_list).post(portfolio::create))
        .route(
            "/portfolio/:id",
            get(portfolio::get_one)
                .put(portfolio::update)
                .patch(portfolio::patch)
                .delete(portfolio::delete),
        )
        // Packages
        .route("/packages", get(packages::admin_list).post(packages::create))
        .route(
            "/packages/:id",
            get(packages::get_one)
                .put(packages::update)
                .patch(packages::patch)
                .delete(packages::delete),
        )
        // Photography types
        .route("/types", get(types::admin_list).post(types::create))
        .route(
            "/types/:id",
            get(types::get_one)
                .put(types::update)
                .patch(types::patch)
                .delete(types::delete),
        )
        // Settings
        .route("/settings", get(settings::admin_get).put(settings::update))
        .route("/settings/logo", post(settings::upload_logo))
        .route("/settings/banner", post(settings::upload_banner))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout))
        // Public content
        .route("/settings", get(settings::get_public))
        .route("/types", get(types::public_list))
        .route("/packages", get(packages::public_list))
        .route("/portfolio", get(portfolio::public_list))
        .route("/gallery", get(gallery::public_list))
        // Public calendar and booking
        .route("/calendar", get(calendar::get_month))
        .route("/calendar/:date", get(calendar::get_day))
        .route("/booking/whatsapp", post(booking::book))
        .route("/inquiry/whatsapp", get(booking::inquiry))
        // Pages
        .route("/pages/home", get(pages::home))
        .route("/pages/services", get(pages::services))
        .route("/pages/services/:slug", get(pages::service_detail))
        .route("/pages/gallery", get(pages::gallery))
        .nest("/admin", admin);

    let mut app = Router::new()
        .route("/sitemap.xml", get(pages::sitemap))
        .nest("/api/v1", api_v1)
        .with_state(state.clone())
        .merge(openapi::create_openapi_router());

    if state.config.storage.kind == StorageKind::Local {
        app = app.nest_service(PUBLIC_PREFIX, ServeDir::new(&state.config.storage.local_root));
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
