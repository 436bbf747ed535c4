//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, availability, booking, calendar, gallery, health, packages, pages, portfolio, settings,
    slots, types,
};
use crate::models::{admin, availability as slots_model, booking as booking_model, entity, page};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio API",
        version = "1.0.0",
        description = "Photography studio site and back-office REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::session,
        auth::logout,
        // Availability
        availability::get_month,
        availability::toggle_day,
        availability::save,
        availability::discard_month,
        slots::list_slots,
        slots::create_slot,
        slots::update_slot,
        slots::delete_slot,
        calendar::get_month,
        calendar::get_day,
        // Booking
        booking::book,
        booking::inquiry,
        // Catalog
        types::public_list,
        types::admin_list,
        types::get_one,
        types::create,
        types::update,
        types::patch,
        types::delete,
        packages::public_list,
        packages::admin_list,
        packages::get_one,
        packages::create,
        packages::update,
        packages::patch,
        packages::delete,
        portfolio::public_list,
        portfolio::admin_list,
        portfolio::get_one,
        portfolio::create,
        portfolio::update,
        portfolio::patch,
        portfolio::delete,
        gallery::public_list,
        gallery::admin_list,
        gallery::get_one,
        gallery::create,
        gallery::update,
        gallery::patch,
        gallery::delete,
        // Settings
        settings::get_public,
        settings::admin_get,
        settings::update,
        settings::upload_logo,
        settings::upload_banner,
        // Pages
        pages::home,
        pages::services,
        pages::service_detail,
        pages::gallery,
    ),
    components(
        schemas(
            // Auth
            admin::LoginRequest,
            admin::LoginResponse,
            admin::SessionInfo,
            // Availability
            slots_model::AdminDay,
            slots_model::AdminMonthView,
            slots_model::ToggleDayRequest,
            slots_model::DiscardMonthRequest,
            slots_model::SaveStatus,
            slots_model::SaveResponse,
            slots_model::SlotStatus,
            slots_model::AvailabilitySlot,
            slots_model::CreateSlot,
            slots_model::UpdateSlot,
            slots_model::DayStatus,
            slots_model::PublicDay,
            slots_model::PublicMonthView,
            slots_model::SlotView,
            slots_model::DayAvailability,
            // Booking
            booking_model::BookingRequest,
            booking_model::BookingLink,
            booking_model::BookingSummary,
            booking_model::BookingResponse,
            // Catalog
            entity::EntityPatch,
            crate::models::PhotographyType,
            crate::models::Category,
            crate::models::photography_type::TypeForm,
            crate::models::Package,
            crate::models::package::PackageForm,
            crate::models::PortfolioPhoto,
            crate::models::portfolio::PortfolioForm,
            portfolio::PortfolioUpload,
            crate::models::GalleryImage,
            crate::models::gallery::GalleryForm,
            gallery::GalleryUpload,
            // Settings
            crate::models::SiteSettings,
            crate::models::settings::UpdateSettings,
            settings::AssetUpload,
            // Pages
            page::HomePage,
            page::ServiceCard,
            page::ServicesPage,
            page::ServiceDetailPage,
            page::GalleryPage,
            crate::seo::PageMetadata,
            crate::seo::OpenGraph,
            crate::seo::OpenGraphImage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Admin sign-in and sessions"),
        (name = "availability", description = "Booked days editor"),
        (name = "slots", description = "Time slots"),
        (name = "calendar", description = "Public availability calendar"),
        (name = "booking", description = "WhatsApp booking and inquiry links"),
        (name = "types", description = "Photography types"),
        (name = "packages", description = "Service packages"),
        (name = "portfolio", description = "Portfolio photos"),
        (name = "gallery", description = "Gallery images"),
        (name = "settings", description = "Site branding and contact settings"),
        (name = "pages", description = "Aggregated public pages")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
