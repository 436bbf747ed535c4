//! Photography type (category) model

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::{Entity, Form};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotographyType {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for PhotographyType {
    const TABLE: &'static str = "photography_types";
    const NAME: &'static str = "Photography type";
    type Form = TypeForm;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Create/update photography type request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct TypeForm {
    #[validate(length(min = 1, message = "Type name is required"))]
    pub name: String,
    /// Derived from the name when empty
    #[serde(default)]
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

impl Form for TypeForm {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        let source = if self.slug.trim().is_empty() { &self.name } else { &self.slug };
        self.slug = slugify(source);
    }
}

/// A category as shown on public pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_\-]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercase, trim, whitespace runs to `-`, drop anything outside `[a-z0-9_-]`
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    NON_SLUG.replace_all(&dashed, "").into_owned()
}

/// `"wedding-day"` to `"Wedding Day"`, used when a slug has no type row
pub fn label_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Wedding Day "), "wedding-day");
        assert_eq!(slugify("Pre-Wedding & Engagement"), "pre-wedding--engagement");
        assert_eq!(slugify("Convo_2024"), "convo_2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_label_from_slug() {
        assert_eq!(label_from_slug("wedding-day"), "Wedding Day");
        assert_eq!(label_from_slug("event"), "Event");
        assert_eq!(label_from_slug("--a--b"), "A B");
        assert_eq!(label_from_slug(""), "");
    }

    #[test]
    fn test_form_derives_slug_from_name() {
        let mut form = TypeForm {
            name: "  Family Portrait ".to_string(),
            slug: String::new(),
            is_active: true,
            sort_order: 0,
        };
        form.normalize();
        assert_eq!(form.name, "Family Portrait");
        assert_eq!(form.slug, "family-portrait");
        assert!(form.validate().is_ok());

        let mut form = TypeForm {
            name: "Family".to_string(),
            slug: "Fam Pics".to_string(),
            is_active: true,
            sort_order: 0,
        };
        form.normalize();
        assert_eq!(form.slug, "fam-pics");
    }

    #[test]
    fn test_form_requires_name() {
        let mut form = TypeForm {
            name: "   ".to_string(),
            slug: String::new(),
            is_active: true,
            sort_order: 0,
        };
        form.normalize();
        assert!(form.validate().is_err());
    }
}
