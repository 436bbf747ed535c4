//! WhatsApp booking and inquiry requests

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// "Book now" request: a package and a date picked on the public calendar
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub package_id: Uuid,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// "HH:MM" or "Any Time"
    pub time: Option<String>,
}

/// Deep link handed back to the visitor's browser
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingLink {
    /// `https://wa.me/<digits>?text=<message>`
    pub url: String,
    /// Plain message before encoding
    pub message: String,
}

/// Booking summary shown before "Book now"
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingSummary {
    pub category: String,
    pub category_label: String,
    pub package_name: String,
    pub price: String,
    pub date_label: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingResponse {
    pub summary: BookingSummary,
    pub link: BookingLink,
}

/// Inquiry link query (date and time optional)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct InquiryQuery {
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    pub time: Option<String>,
}
