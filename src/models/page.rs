//! Public page payloads

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    gallery::GalleryImage, package::Package, photography_type::Category, portfolio::PortfolioPhoto,
    settings::SiteSettings,
};
use crate::seo::PageMetadata;

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CategoryQuery {
    /// Category slug
    pub category: Option<String>,
}

/// Home page: hero, portfolio and packages of the selected category
#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub settings: SiteSettings,
    pub categories: Vec<Category>,
    pub selected_category: Option<Category>,
    pub portfolio: Vec<PortfolioPhoto>,
    pub packages: Vec<Package>,
    /// WhatsApp link offered when the selected category has no packages
    pub package_contact_link: Option<String>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCard {
    pub slug: String,
    pub name: String,
    pub path: String,
    pub package_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServicesPage {
    pub services: Vec<ServiceCard>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDetailPage {
    pub category: Category,
    pub hero_title: String,
    pub hero_description: String,
    pub packages: Vec<Package>,
    pub portfolio: Vec<PortfolioPhoto>,
    pub package_contact_link: Option<String>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryPage {
    pub categories: Vec<Category>,
    pub selected_category: Option<String>,
    pub images: Vec<GalleryImage>,
    pub metadata: PageMetadata,
}
