//! Site branding settings (singleton row `id = 1`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity::trimmed;

pub const SETTINGS_ID: i32 = 1;
pub const ASSETS_BUCKET: &str = "site-assets";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SiteSettings {
    #[serde(default = "settings_id")]
    pub id: i32,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub brand_domain: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
    #[serde(default)]
    pub hero_description: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub facebook_url: Option<String>,
    #[serde(default)]
    pub tiktok_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn settings_id() -> i32 {
    SETTINGS_ID
}

impl SiteSettings {
    /// Brand shown in greetings, with a fallback when unset
    pub fn brand_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.brand_name
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(fallback)
    }
}

/// Settings update request; blank values clear the field, except the asset URLs
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSettings {
    pub brand_name: Option<String>,
    pub brand_domain: Option<String>,
    /// Kept when omitted; normally set through the asset upload endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub hero_description: Option<String>,
    pub contact_phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub tiktok_url: Option<String>,
}

impl UpdateSettings {
    /// Trim every field, storing blanks as null
    pub fn normalized(self) -> Self {
        Self {
            brand_name: trimmed(self.brand_name),
            brand_domain: trimmed(self.brand_domain),
            logo_url: trimmed(self.logo_url),
            banner_url: trimmed(self.banner_url),
            hero_title: trimmed(self.hero_title),
            hero_subtitle: trimmed(self.hero_subtitle),
            hero_description: trimmed(self.hero_description),
            contact_phone: trimmed(self.contact_phone),
            whatsapp_number: trimmed(self.whatsapp_number),
            instagram_url: trimmed(self.instagram_url),
            facebook_url: trimmed(self.facebook_url),
            tiktok_url: trimmed(self.tiktok_url),
        }
    }
}

/// Which branding image an upload replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAsset {
    Logo,
    Banner,
}

impl SiteAsset {
    pub fn folder(self) -> &'static str {
        match self {
            SiteAsset::Logo => "logo",
            SiteAsset::Banner => "banner",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SiteAsset::Logo => "logo_url",
            SiteAsset::Banner => "banner_url",
        }
    }
}
