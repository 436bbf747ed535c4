//! WhatsApp booking links
//!
//! Nothing is reserved here: the visitor gets a prefilled `wa.me` link and
//! the conversation happens on WhatsApp.

use chrono::NaiveDate;

use crate::{
    calendar::{long_date, parse_date, ANY_TIME},
    error::{AppError, AppResult},
    models::{
        booking::{BookingLink, BookingRequest, BookingResponse, BookingSummary, InquiryQuery},
        Package, SiteSettings,
    },
    repository::entities::EntitiesRepository,
};

use super::settings::{category_label, SettingsService};

pub const WHATSAPP_UNAVAILABLE: &str =
    "WhatsApp booking is not available right now. Please use the inquiry section below to contact us.";

const FLEXIBLE_TIME: &str = "Flexible / Any time";

/// Digits of a phone number as `wa.me` expects them, `None` when there are none
pub fn whatsapp_digits(number: Option<&str>) -> Option<String> {
    let digits: String = number?.chars().filter(char::is_ascii_digit).collect();
    Some(digits).filter(|d| !d.is_empty())
}

pub fn whatsapp_url(digits: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", digits, urlencoding::encode(message))
}

/// A real time the visitor picked, ignoring the "Any Time" sentinel
fn picked_time(time: Option<&str>) -> Option<&str> {
    time.map(str::trim).filter(|t| !t.is_empty() && *t != ANY_TIME)
}

pub fn booking_message(brand: &str, label: &str, package: &Package, date: NaiveDate, time: Option<&str>) -> String {
    format!(
        "Hi {}!\n\nI'd like to book a {} session.\n\nPackage: {}\nPrice: {}\nDate: {}\nTime: {}\nPax: \n\nThank you!",
        brand,
        label,
        package.name,
        package.price,
        long_date(date),
        picked_time(time).unwrap_or_default()
    )
}

pub fn inquiry_message(brand: &str, date: Option<NaiveDate>, time: Option<&str>) -> String {
    let mut message = format!("Hi {}!\n\nI'm interested in your photography services.\n\n", brand);
    if let Some(date) = date {
        message.push_str(&format!("Preferred Date: {}\n", long_date(date)));
        message.push_str(&format!(
            "Preferred Time: {}\n\n",
            picked_time(time).unwrap_or(FLEXIBLE_TIME)
        ));
    }
    message.push_str("Please let me know about availability and next steps.\n\nThank you!");
    message
}

pub fn package_contact_message(brand: &str, label: &str) -> String {
    format!(
        "Hi {}!\n\nI'm interested in your {} package.\n\nPlease share availability and pricing details.\n\nThank you!",
        brand, label
    )
}

/// Contact link offered when a category has no packages yet
pub fn package_contact_link(settings: &SiteSettings, brand: &str, label: &str) -> Option<String> {
    let number = settings
        .contact_phone
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or(settings.whatsapp_number.as_deref());
    let digits = whatsapp_digits(number)?;
    Some(whatsapp_url(&digits, &package_contact_message(brand, label)))
}

#[derive(Clone)]
pub struct BookingService {
    settings: SettingsService,
    packages: EntitiesRepository<Package>,
}

impl BookingService {
    pub fn new(settings: SettingsService, packages: EntitiesRepository<Package>) -> Self {
        Self { settings, packages }
    }

    /// "Book now": summary of the picked package and date with its WhatsApp link
    pub async fn book(&self, request: BookingRequest) -> AppResult<BookingResponse> {
        let package = self.packages.get(request.package_id).await?;
        if !package.is_active {
            return Err(AppError::NotFound(format!("Package {} not found", package.id)));
        }
        let date = parse_date(request.date.trim())?;

        let settings = self.settings.get().await?;
        let digits = whatsapp_digits(settings.whatsapp_number.as_deref())
            .ok_or_else(|| AppError::BusinessRule(WHATSAPP_UNAVAILABLE.to_string()))?;

        let categories = self.settings.categories().await?;
        let label = category_label(&categories, &package.category);
        let brand = settings.brand_or(&self.settings.site().site_name);
        let time = request.time.as_deref();

        let message = booking_message(brand, &label, &package, date, time);
        tracing::info!(package = %package.id, %date, "WhatsApp booking link composed");

        Ok(BookingResponse {
            summary: BookingSummary {
                category: package.category.clone(),
                category_label: label,
                package_name: package.name.clone(),
                price: package.price.clone(),
                date_label: long_date(date),
                time: picked_time(time).unwrap_or(ANY_TIME).to_string(),
            },
            link: BookingLink {
                url: whatsapp_url(&digits, &message),
                message,
            },
        })
    }

    /// General inquiry link, optionally carrying a preferred date
    pub async fn inquiry(&self, query: InquiryQuery) -> AppResult<BookingLink> {
        let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Some(parse_date(d)?),
            None => None,
        };

        let settings = self.settings.get().await?;
        let digits = whatsapp_digits(settings.whatsapp_number.as_deref())
            .ok_or_else(|| AppError::BusinessRule(WHATSAPP_UNAVAILABLE.to_string()))?;
        let brand = settings.brand_or(&self.settings.site().site_name);

        let message = inquiry_message(brand, date, query.time.as_deref());
        Ok(BookingLink {
            url: whatsapp_url(&digits, &message),
            message,
        })
    }
}
