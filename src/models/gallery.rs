//! Gallery image model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::{trimmed, Entity, Form, ImageEntity};
use crate::storage::gallery_object_path;

pub const GALLERY_BUCKET: &str = "gallery";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryImage {
    pub id: Uuid,
    pub url: String,
    /// Object path in the `gallery` bucket; null on legacy rows
    pub path: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for GalleryImage {
    const TABLE: &'static str = "gallery_images";
    const NAME: &'static str = "Gallery image";
    const CATEGORY_COLUMN: Option<&'static str> = Some("category");
    const BUCKET: Option<&'static str> = Some(GALLERY_BUCKET);
    type Form = GalleryForm;

    fn id(&self) -> Uuid {
        self.id
    }

    fn image_ref(&self) -> Option<(Option<&str>, &str)> {
        Some((self.path.as_deref(), &self.url))
    }
}

impl ImageEntity for GalleryImage {
    const URL_COLUMN: &'static str = "url";

    fn object_path(form: &GalleryForm, filename: &str, now: DateTime<Utc>) -> String {
        gallery_object_path(form.category.as_deref(), filename, now)
    }
}

/// Gallery image fields; no title is required
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct GalleryForm {
    pub category: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Form for GalleryForm {
    fn normalize(&mut self) {
        self.category = trimmed(self.category.take());
    }
}
