//! Service package model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Form};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Package {
    pub id: Uuid,
    /// Photography type slug
    pub category: String,
    pub name: String,
    /// Free text, e.g. "RM 350"
    pub price: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Package {
    const TABLE: &'static str = "packages";
    const NAME: &'static str = "Package";
    const CATEGORY_COLUMN: Option<&'static str> = Some("category");
    type Form = PackageForm;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Create/update package request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PackageForm {
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Please fill in name, price and description."))]
    pub name: String,
    #[validate(length(min = 1, message = "Please fill in name, price and description."))]
    pub price: String,
    #[validate(length(min = 1, message = "Please fill in name, price and description."))]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Form for PackageForm {
    fn normalize(&mut self) {
        self.category = self.category.trim().to_string();
        self.name = self.name.trim().to_string();
        self.price = self.price.trim().to_string();
        self.description = self.description.trim().to_string();
        self.features = self
            .features
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
    }
}
