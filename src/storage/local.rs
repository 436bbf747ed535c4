//! Filesystem-backed object storage, served by the HTTP router under `/storage`

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{public_url_for, validate_path, ObjectStorage, StorageError};

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        validate_path(bucket)?;
        validate_path(path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(path.to_string())
            } else {
                StorageError::Io(e.to_string())
            }
        })?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        file.flush().await.map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(bucket, path, size = bytes.len(), "stored object on disk");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_url_for(&self.public_base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            let target = self.object_path(bucket, path)?;
            match tokio::fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::Io(e.to_string())),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("studio-storage-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_upload_without_overwrite_refuses_existing() {
        let root = scratch_dir();
        let storage = LocalStorage::new(&root, "http://localhost:8080");

        storage
            .upload("gallery", "event/a.jpg", vec![1, 2, 3], Some("image/jpeg"), false)
            .await
            .unwrap();
        assert!(root.join("gallery/event/a.jpg").exists());

        let err = storage
            .upload("gallery", "event/a.jpg", vec![4], None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));

        storage.upload("gallery", "event/a.jpg", vec![4], None, true).await.unwrap();
        assert_eq!(std::fs::read(root.join("gallery/event/a.jpg")).unwrap(), vec![4]);

        storage.remove("gallery", &["event/a.jpg".to_string()]).await.unwrap();
        assert!(!root.join("gallery/event/a.jpg").exists());
        // removing twice is fine
        storage.remove("gallery", &["event/a.jpg".to_string()]).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let storage = LocalStorage::new(scratch_dir(), "http://localhost:8080");
        let err = storage
            .upload("gallery", "../../x.jpg", vec![], None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidPath(_)));
    }

    #[test]
    fn test_public_url() {
        let storage = LocalStorage::new("uploads", "http://localhost:8080/");
        assert_eq!(
            storage.public_url("portfolio", "wedding/1-a.jpg"),
            "http://localhost:8080/storage/v1/object/public/portfolio/wedding/1-a.jpg"
        );
    }
}
