//! WhatsApp booking endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::booking::{BookingLink, BookingRequest, BookingResponse, InquiryQuery},
};

/// Compose the "Book now" WhatsApp link for a package and date
#[utoipa::path(
    post,
    path = "/booking/whatsapp",
    tag = "booking",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking summary and link", body = BookingResponse),
        (status = 404, description = "Package not found", body = crate::error::ErrorResponse),
        (status = 422, description = "WhatsApp booking is not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn book(
    State(state): State<crate::AppState>,
    Json(request): Json<BookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let response = state.services.booking.book(request).await?;
    Ok(Json(response))
}

/// General inquiry link, optionally with a preferred date and time
#[utoipa::path(
    get,
    path = "/inquiry/whatsapp",
    tag = "booking",
    params(InquiryQuery),
    responses(
        (status = 200, description = "Inquiry link", body = BookingLink),
        (status = 422, description = "WhatsApp is not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn inquiry(
    State(state): State<crate::AppState>,
    Query(query): Query<InquiryQuery>,
) -> AppResult<Json<BookingLink>> {
    let link = state.services.booking.inquiry(query).await?;
    Ok(Json(link))
}
