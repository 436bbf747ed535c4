//! Image uploads to object storage

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Upload,
    storage::{file_extension, path_from_public_url, ObjectStorage},
};

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "avif", "svg", "ico"];

/// Reject empty, oversized or non-image uploads
pub fn check_image(upload: &Upload) -> AppResult<()> {
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Please choose an image file.".to_string()));
    }
    if upload.bytes.len() > MAX_IMAGE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }

    let declared_image = upload
        .content_type
        .as_deref()
        .map(|ct| ct.starts_with("image/"))
        .unwrap_or(false);
    let ext = file_extension(&upload.filename);
    if !declared_image && !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            IMAGE_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Storage path of an image row: the stored path, else recovered from its URL
pub fn resolve_object_path(bucket: &str, stored: Option<&str>, url: &str) -> Option<String> {
    stored
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| path_from_public_url(bucket, url))
}

#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn ObjectStorage>,
}

impl MediaService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Upload an image and return its public URL
    pub async fn store(&self, bucket: &str, path: &str, upload: Upload, overwrite: bool) -> AppResult<String> {
        check_image(&upload)?;
        let size = upload.bytes.len();
        self.storage
            .upload(bucket, path, upload.bytes, upload.content_type.as_deref(), overwrite)
            .await?;
        tracing::info!(bucket, path, size, "Uploaded image");
        Ok(self.storage.public_url(bucket, path))
    }

    pub async fn remove(&self, bucket: &str, path: &str) -> AppResult<()> {
        self.storage.remove(bucket, &[path.to_string()]).await?;
        tracing::info!(bucket, path, "Removed image");
        Ok(())
    }
}
