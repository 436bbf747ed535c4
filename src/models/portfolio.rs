//! Portfolio photo model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Form, ImageEntity};
use crate::storage::portfolio_object_path;

pub const PORTFOLIO_BUCKET: &str = "portfolio";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortfolioPhoto {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub alt: String,
    pub image_url: String,
    /// Object path in the `portfolio` bucket; null on legacy rows
    pub path: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for PortfolioPhoto {
    const TABLE: &'static str = "portfolio_photos";
    const NAME: &'static str = "Portfolio photo";
    const CATEGORY_COLUMN: Option<&'static str> = Some("category");
    const BUCKET: Option<&'static str> = Some(PORTFOLIO_BUCKET);
    type Form = PortfolioForm;

    fn id(&self) -> Uuid {
        self.id
    }

    fn image_ref(&self) -> Option<(Option<&str>, &str)> {
        Some((self.path.as_deref(), &self.image_url))
    }
}

impl ImageEntity for PortfolioPhoto {
    const URL_COLUMN: &'static str = "image_url";

    fn object_path(form: &PortfolioForm, filename: &str, now: DateTime<Utc>) -> String {
        portfolio_object_path(&form.category, &form.title, filename, now)
    }
}

/// Portfolio photo fields (multipart on create, JSON on update)
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct PortfolioForm {
    #[validate(length(min = 1, message = "Please choose a category."))]
    pub category: String,
    #[validate(length(min = 1, message = "Please enter a title."))]
    pub title: String,
    #[validate(length(min = 1, message = "Please enter alt text."))]
    pub alt: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Form for PortfolioForm {
    fn normalize(&mut self) {
        self.category = self.category.trim().to_string();
        self.title = self.title.trim().to_string();
        self.alt = self.alt.trim().to_string();
    }
}
