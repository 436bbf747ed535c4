//! Settings service: site branding and the photography category list

use std::sync::Arc;

use chrono::Utc;

use crate::{
    backend::to_row,
    config::SiteConfig,
    error::AppResult,
    models::{
        photography_type::label_from_slug,
        settings::{SiteAsset, UpdateSettings, ASSETS_BUCKET},
        Category, ListFilter, PhotographyType, SiteSettings, Upload,
    },
    repository::Repository,
    storage::asset_object_path,
};

use super::media::MediaService;

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    media: MediaService,
    site: Arc<SiteConfig>,
}

impl SettingsService {
    pub fn new(repository: Repository, media: MediaService, site: Arc<SiteConfig>) -> Self {
        Self {
            repository,
            media,
            site,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Get current settings
    pub async fn get(&self) -> AppResult<SiteSettings> {
        self.repository.settings.get().await
    }

    /// Replace the editable settings; blank fields are cleared
    pub async fn update(&self, data: UpdateSettings) -> AppResult<SiteSettings> {
        let mut row = to_row(&data.normalized())?;
        row.insert("updated_at".to_string(), Utc::now().to_rfc3339().into());
        let settings = self.repository.settings.save(row).await?;
        tracing::info!("Site settings updated");
        Ok(settings)
    }

    /// Upload a logo or banner and point the settings at it
    pub async fn upload_asset(&self, asset: SiteAsset, upload: Upload) -> AppResult<SiteSettings> {
        let now = Utc::now();
        let path = asset_object_path(asset.folder(), &upload.filename, now);
        let url = self.media.store(ASSETS_BUCKET, &path, upload, true).await?;

        let mut row = crate::backend::Row::new();
        row.insert(asset.column().to_string(), url.into());
        row.insert("updated_at".to_string(), now.to_rfc3339().into());
        self.repository.settings.save(row).await
    }

    /// Active photography types ordered for display
    pub async fn active_types(&self) -> AppResult<Vec<PhotographyType>> {
        self.repository
            .entities::<PhotographyType>()
            .list(&ListFilter {
                category: None,
                active_only: true,
            })
            .await
    }

    /// Categories offered to visitors; the configured defaults when no type is active
    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        let types = self.active_types().await?;
        if types.is_empty() {
            return Ok(self
                .site
                .default_categories
                .iter()
                .map(|c| Category {
                    slug: c.slug.clone(),
                    name: c.name.clone(),
                })
                .collect());
        }
        Ok(types
            .into_iter()
            .map(|t| Category {
                slug: t.slug,
                name: t.name,
            })
            .collect())
    }
}

/// Display label of a category slug
pub fn category_label(categories: &[Category], slug: &str) -> String {
    categories
        .iter()
        .find(|c| c.slug == slug)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| label_from_slug(slug))
}
