//! Admin-managed record kinds
//!
//! Gallery images, portfolio photos, packages and photography types share one
//! CRUD surface. Each kind describes its table, category column and storage
//! binding here, and the catalog service does the rest.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Payload accepted on create and full update
pub trait Form: Serialize + Validate + Send + Sync {
    /// Trim and derive fields before validation
    fn normalize(&mut self) {}
}

/// A row kind handled by the generic entity manager
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Human name used in error messages
    const NAME: &'static str;
    /// Column filtered by `?category=`, if the kind has one
    const CATEGORY_COLUMN: Option<&'static str> = None;
    /// Storage bucket holding the row's image, if the kind has one
    const BUCKET: Option<&'static str> = None;

    type Form: Form;

    fn id(&self) -> Uuid;

    /// Stored object path and public URL of the row's image
    fn image_ref(&self) -> Option<(Option<&str>, &str)> {
        None
    }
}

/// An entity created together with an uploaded image
pub trait ImageEntity: Entity {
    /// Column receiving the public URL
    const URL_COLUMN: &'static str;

    /// Object path for a new upload
    fn object_path(form: &Self::Form, filename: &str, now: DateTime<Utc>) -> String;
}

/// List filter shared by every kind
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ListFilter {
    /// Category slug
    pub category: Option<String>,
    /// Only rows with `is_active = true`
    #[serde(default)]
    pub active_only: bool,
}

impl ListFilter {
    pub fn category(category: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.trim().is_empty()),
            active_only: true,
        }
    }
}

/// Inline edit of the active flag and sort order
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct EntityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl EntityPatch {
    pub fn is_empty(&self) -> bool {
        self.is_active.is_none() && self.sort_order.is_none()
    }
}

/// An uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Trim a string, mapping blank to `None`
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
