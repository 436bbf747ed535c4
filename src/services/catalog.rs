//! Catalog service: gallery, portfolio, packages and photography types
//!
//! One generic manager per record kind. Image-bearing kinds upload the file
//! before inserting the row and remove it before deleting the row.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    backend::to_row,
    error::{AppError, AppResult},
    models::{
        Entity, EntityPatch, Form, GalleryImage, ImageEntity, ListFilter, Package, PhotographyType,
        PortfolioPhoto, Upload,
    },
    repository::{entities::EntitiesRepository, Repository},
};

use super::media::{resolve_object_path, MediaService};

pub const MISSING_STORAGE_PATH: &str = "Missing storage path. Cannot delete file.";

pub struct EntityManager<E> {
    repo: EntitiesRepository<E>,
    media: MediaService,
}

impl<E> Clone for EntityManager<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            media: self.media.clone(),
        }
    }
}

fn prepare<F: Form>(form: &mut F) -> AppResult<()> {
    form.normalize();
    form.validate()?;
    Ok(())
}

impl<E: Entity> EntityManager<E> {
    pub fn new(repo: EntitiesRepository<E>, media: MediaService) -> Self {
        Self { repo, media }
    }

    pub async fn list(&self, filter: &ListFilter) -> AppResult<Vec<E>> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<E> {
        self.repo.get(id).await
    }

    pub async fn create(&self, mut form: E::Form) -> AppResult<E> {
        prepare(&mut form)?;
        let created = self.repo.insert(to_row(&form)?).await?;
        tracing::info!("{} {} created", E::NAME, created.id());
        Ok(created)
    }

    /// Full-form update
    pub async fn update(&self, id: Uuid, mut form: E::Form) -> AppResult<E> {
        prepare(&mut form)?;
        let updated = self.repo.update(id, to_row(&form)?).await?;
        tracing::info!("{} {} updated", E::NAME, id);
        Ok(updated)
    }

    /// Inline edit of the active flag or sort order
    pub async fn patch(&self, id: Uuid, patch: EntityPatch) -> AppResult<E> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }
        self.repo.update(id, to_row(&patch)?).await
    }

    /// Delete a row, removing its stored image first
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let existing = self.repo.get(id).await?;

        if let (Some(bucket), Some((path, url))) = (E::BUCKET, existing.image_ref()) {
            let path = resolve_object_path(bucket, path, url)
                .ok_or_else(|| AppError::BusinessRule(MISSING_STORAGE_PATH.to_string()))?;
            self.media.remove(bucket, &path).await?;
        }

        self.repo.delete(id).await?;
        tracing::info!("{} {} deleted", E::NAME, id);
        Ok(())
    }
}

impl<E: ImageEntity> EntityManager<E> {
    /// Upload the image, then insert the row pointing at it
    pub async fn create_with_image(&self, mut form: E::Form, upload: Upload) -> AppResult<E> {
        prepare(&mut form)?;
        let bucket = E::BUCKET
            .ok_or_else(|| AppError::Internal(format!("{} has no storage bucket", E::NAME)))?;

        let path = E::object_path(&form, &upload.filename, Utc::now());
        let url = self.media.store(bucket, &path, upload, false).await?;

        let mut row = to_row(&form)?;
        row.insert(E::URL_COLUMN.to_string(), url.into());
        row.insert("path".to_string(), path.clone().into());

        match self.repo.insert(row).await {
            Ok(created) => {
                tracing::info!("{} {} created at {}", E::NAME, created.id(), path);
                Ok(created)
            }
            Err(e) => {
                if let Err(cleanup) = self.media.remove(bucket, &path).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    /// One row per uploaded file, sharing the same form fields
    pub async fn create_many(&self, form: E::Form, uploads: Vec<Upload>) -> AppResult<Vec<E>>
    where
        E::Form: Clone,
    {
        if uploads.is_empty() {
            return Err(AppError::Validation("Please select at least one image.".to_string()));
        }
        let mut created = Vec::with_capacity(uploads.len());
        for upload in uploads {
            created.push(self.create_with_image(form.clone(), upload).await?);
        }
        Ok(created)
    }
}

/// Managers for every admin-editable record kind
#[derive(Clone)]
pub struct CatalogService {
    pub gallery: EntityManager<GalleryImage>,
    pub portfolio: EntityManager<PortfolioPhoto>,
    pub packages: EntityManager<Package>,
    pub types: EntityManager<PhotographyType>,
}

impl CatalogService {
    pub fn new(repository: &Repository, media: MediaService) -> Self {
        Self {
            gallery: EntityManager::new(repository.entities(), media.clone()),
            portfolio: EntityManager::new(repository.entities(), media.clone()),
            packages: EntityManager::new(repository.entities(), media.clone()),
            types: EntityManager::new(repository.entities(), media),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::{MemoryTables, TableClient};
    use crate::models::{
        gallery::GalleryForm, package::PackageForm, photography_type::TypeForm, portfolio::PortfolioForm,
    };
    use crate::storage::{MemoryStorage, ObjectStorage};
    use serde_json::json;

    struct Fixture {
        tables: Arc<MemoryTables>,
        storage: Arc<MemoryStorage>,
        catalog: CatalogService,
    }

    fn fixture() -> Fixture {
        let tables = Arc::new(MemoryTables::new());
        let storage = Arc::new(MemoryStorage::new("https://cdn.studio.test"));
        let repository = Repository::new(tables.clone());
        let catalog = CatalogService::new(&repository, MediaService::new(storage.clone()));
        Fixture {
            tables,
            storage,
            catalog,
        }
    }

    fn image(name: &str) -> Upload {
        Upload {
            filename: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    fn portfolio_form() -> PortfolioForm {
        PortfolioForm {
            category: "wedding".to_string(),
            title: "First Dance".to_string(),
            alt: "Couple dancing".to_string(),
            sort_order: 0,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_portfolio_create_uploads_then_delete_removes() {
        let f = fixture();
        let photo = f
            .catalog
            .portfolio
            .create_with_image(portfolio_form(), image("DSC_001.JPG"))
            .await
            .unwrap();

        let path = photo.path.clone().unwrap();
        assert!(path.starts_with("wedding/"));
        assert!(path.ends_with("-first-dance.jpg"));
        assert!(f.storage.contains("portfolio", &path));
        assert_eq!(
            photo.image_url,
            format!("https://cdn.studio.test/storage/v1/object/public/portfolio/{}", path)
        );

        f.catalog.portfolio.delete(photo.id).await.unwrap();
        assert!(!f.storage.contains("portfolio", &path));
        assert!(f.catalog.portfolio.get(photo.id).await.is_err());
    }

    #[tokio::test]
    async fn test_portfolio_requires_title_before_upload() {
        let f = fixture();
        let mut form = portfolio_form();
        form.title = "   ".to_string();
        let err = f
            .catalog
            .portfolio
            .create_with_image(form, image("a.jpg"))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Please enter a title."),
            other => panic!("unexpected {:?}", other),
        }
        assert!(f.storage.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_row_path_recovered_from_url() {
        let f = fixture();
        f.storage
            .upload("gallery", "gallery/event/old.jpg", vec![1], None, false)
            .await
            .unwrap();
        let rows = f
            .tables
            .insert(
                "gallery_images",
                vec![to_row(&json!({
                    "url": "https://cdn.studio.test/storage/v1/object/public/gallery/gallery/event/old.jpg",
                    "path": null,
                    "category": "event",
                    "sort_order": 0,
                    "is_active": true,
                }))
                .unwrap()],
            )
            .await
            .unwrap();
        let id: Uuid = rows[0]["id"].as_str().unwrap().parse().unwrap();

        f.catalog.gallery.delete(id).await.unwrap();
        assert!(!f.storage.contains("gallery", "gallery/event/old.jpg"));
    }

    #[tokio::test]
    async fn test_delete_without_recoverable_path_fails() {
        let f = fixture();
        let rows = f
            .tables
            .insert(
                "gallery_images",
                vec![to_row(&json!({
                    "url": "https://elsewhere.example.com/photo.jpg",
                    "sort_order": 0,
                    "is_active": true,
                }))
                .unwrap()],
            )
            .await
            .unwrap();
        let id: Uuid = rows[0]["id"].as_str().unwrap().parse().unwrap();

        let err = f.catalog.gallery.delete(id).await.unwrap_err();
        match err {
            AppError::BusinessRule(msg) => assert_eq!(msg, MISSING_STORAGE_PATH),
            other => panic!("unexpected {:?}", other),
        }
        // the row stays
        assert!(f.catalog.gallery.get(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_gallery_create_many() {
        let f = fixture();
        let form = GalleryForm {
            category: Some(" Event ".to_string()),
            sort_order: 0,
            is_active: true,
        };
        let created = f
            .catalog
            .gallery
            .create_many(form.clone(), vec![image("a.jpg"), image("b.png")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].category.as_deref(), Some("Event"));
        assert!(created[0].path.as_deref().unwrap().starts_with("gallery/event/"));
        assert_eq!(f.storage.len(), 2);

        let err = f.catalog.gallery.create_many(form, vec![]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_type_slug_unique() {
        let f = fixture();
        let form = TypeForm {
            name: "Wedding".to_string(),
            slug: String::new(),
            is_active: true,
            sort_order: 0,
        };
        let created = f.catalog.types.create(form.clone()).await.unwrap();
        assert_eq!(created.slug, "wedding");

        let err = f.catalog.types.create(form).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(ref b) if b.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_package_patch_and_ordering() {
        let f = fixture();
        let form = |name: &str, sort_order: i32| PackageForm {
            category: "wedding".to_string(),
            name: name.to_string(),
            price: "RM 500".to_string(),
            description: "Coverage".to_string(),
            features: vec![],
            highlighted: false,
            sort_order,
            is_active: true,
        };
        let gold = f.catalog.packages.create(form("Gold", 1)).await.unwrap();
        f.catalog.packages.create(form("Silver", 2)).await.unwrap();

        f.catalog
            .packages
            .patch(
                gold.id,
                EntityPatch {
                    is_active: None,
                    sort_order: Some(5),
                },
            )
            .await
            .unwrap();
        let listed = f.catalog.packages.list(&ListFilter::default()).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Silver", "Gold"]);

        let err = f.catalog.packages.patch(gold.id, EntityPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
