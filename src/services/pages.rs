//! Public page assembly and SEO documents

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        page::{GalleryPage, HomePage, ServiceCard, ServiceDetailPage, ServicesPage},
        Category, GalleryImage, ListFilter, Package, PortfolioPhoto,
    },
    repository::{entities::EntitiesRepository, Repository},
    seo,
};

use super::{booking::package_contact_link, settings::SettingsService};

#[derive(Clone)]
pub struct PagesService {
    settings: SettingsService,
    packages: EntitiesRepository<Package>,
    portfolio: EntitiesRepository<PortfolioPhoto>,
    gallery: EntitiesRepository<GalleryImage>,
}

impl PagesService {
    pub fn new(repository: &Repository, settings: SettingsService) -> Self {
        Self {
            settings,
            packages: repository.entities(),
            portfolio: repository.entities(),
            gallery: repository.entities(),
        }
    }

    /// Active packages and portfolio of one category, plus the fallback contact link
    async fn category_content(
        &self,
        category: &Category,
    ) -> AppResult<(Vec<Package>, Vec<PortfolioPhoto>, Option<String>)> {
        let filter = ListFilter::category(Some(category.slug.clone()));
        let packages = self.packages.list(&filter).await?;
        let portfolio = self.portfolio.list(&filter).await?;

        let contact_link = if packages.is_empty() {
            let settings = self.settings.get().await?;
            let brand = settings.brand_or(&self.settings.site().site_name);
            package_contact_link(&settings, brand, &category.name)
        } else {
            None
        };
        Ok((packages, portfolio, contact_link))
    }

    /// Home page; portfolio and packages are shown only for a selected category
    pub async fn home(&self, category: Option<String>) -> AppResult<HomePage> {
        let settings = self.settings.get().await?;
        let categories = self.settings.categories().await?;
        let selected = category
            .as_deref()
            .map(str::trim)
            .and_then(|slug| categories.iter().find(|c| c.slug == slug))
            .cloned();

        let (packages, portfolio, package_contact_link) = match &selected {
            Some(category) => self.category_content(category).await?,
            None => (Vec::new(), Vec::new(), None),
        };

        Ok(HomePage {
            metadata: seo::default_metadata(self.settings.site(), "/"),
            settings,
            categories,
            selected_category: selected,
            portfolio,
            packages,
            package_contact_link,
        })
    }

    pub async fn services(&self) -> AppResult<ServicesPage> {
        let categories = self.settings.categories().await?;
        let packages = self.packages.list(&ListFilter::category(None)).await?;

        let services = categories
            .into_iter()
            .map(|c| ServiceCard {
                path: format!("/services/{}", c.slug),
                package_count: packages.iter().filter(|p| p.category == c.slug).count(),
                slug: c.slug,
                name: c.name,
            })
            .collect();

        Ok(ServicesPage {
            services,
            metadata: seo::services_metadata(self.settings.site()),
        })
    }

    pub async fn service_detail(&self, slug: &str) -> AppResult<ServiceDetailPage> {
        let category = self
            .settings
            .categories()
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", slug)))?;

        let (packages, portfolio, package_contact_link) = self.category_content(&category).await?;
        let seo = seo::service_seo(self.settings.site(), &category);

        Ok(ServiceDetailPage {
            category,
            hero_title: seo.hero_title,
            hero_description: seo.hero_description,
            packages,
            portfolio,
            package_contact_link,
            metadata: seo.metadata,
        })
    }

    pub async fn gallery(&self, category: Option<String>) -> AppResult<GalleryPage> {
        let filter = ListFilter::category(category);
        let images = self.gallery.list(&filter).await?;

        Ok(GalleryPage {
            categories: self.settings.categories().await?,
            selected_category: filter.category,
            images,
            metadata: seo::gallery_metadata(self.settings.site()),
        })
    }

    pub async fn sitemap(&self) -> AppResult<String> {
        let slugs: Vec<String> = self
            .settings
            .categories()
            .await?
            .into_iter()
            .map(|c| c.slug)
            .collect();
        Ok(seo::sitemap_xml(self.settings.site(), &slugs, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::MemoryTables;
    use crate::config::SiteConfig;
    use crate::models::{package::PackageForm, Form};
    use crate::services::{catalog::CatalogService, media::MediaService};
    use crate::storage::MemoryStorage;

    fn setup() -> (CatalogService, SettingsService, PagesService) {
        let repository = Repository::new(Arc::new(MemoryTables::new()));
        let media = MediaService::new(Arc::new(MemoryStorage::new("http://localhost:8080")));
        let settings = SettingsService::new(repository.clone(), media.clone(), Arc::new(SiteConfig::default()));
        let pages = PagesService::new(&repository, settings.clone());
        (CatalogService::new(&repository, media), settings, pages)
    }

    fn package(category: &str, name: &str) -> PackageForm {
        let mut form = PackageForm {
            category: category.to_string(),
            name: name.to_string(),
            price: "RM 300".to_string(),
            description: "Two hours".to_string(),
            features: vec!["20 edited photos".to_string()],
            highlighted: false,
            sort_order: 0,
            is_active: true,
        };
        form.normalize();
        form
    }

    #[tokio::test]
    async fn test_home_without_category_shows_no_packages() {
        let (catalog, _, pages) = setup();
        catalog.packages.create(package("wedding", "Gold")).await.unwrap();

        let home = pages.home(None).await.unwrap();
        assert!(home.selected_category.is_none());
        assert!(home.packages.is_empty());
        assert_eq!(home.categories.len(), 3);

        let home = pages.home(Some("wedding".to_string())).await.unwrap();
        assert_eq!(home.selected_category.unwrap().name, "Wedding");
        assert_eq!(home.packages.len(), 1);
        assert!(home.package_contact_link.is_none());
    }

    #[tokio::test]
    async fn test_empty_category_offers_contact_link() {
        let (_, settings, pages) = setup();
        settings
            .update(crate::models::settings::UpdateSettings {
                whatsapp_number: Some("60123456789".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let detail = pages.service_detail("event").await.unwrap();
        assert!(detail.packages.is_empty());
        let link = detail.package_contact_link.unwrap();
        assert!(link.starts_with("https://wa.me/60123456789?text=Hi%20Studio%21"));
        assert!(detail.metadata.canonical.ends_with("/services/event"));
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_found() {
        let (_, _, pages) = setup();
        assert!(matches!(
            pages.service_detail("underwater").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_services_and_sitemap() {
        let (catalog, _, pages) = setup();
        catalog.packages.create(package("wedding", "Gold")).await.unwrap();
        catalog.packages.create(package("wedding", "Silver")).await.unwrap();

        let services = pages.services().await.unwrap();
        let wedding = services.services.iter().find(|s| s.slug == "wedding").unwrap();
        assert_eq!(wedding.package_count, 2);
        assert_eq!(wedding.path, "/services/wedding");

        let xml = pages.sitemap().await.unwrap();
        assert!(xml.contains("<loc>http://localhost:8080/services/convocation</loc>"));
        assert!(xml.contains("<loc>http://localhost:8080/gallery</loc>"));
    }
}
