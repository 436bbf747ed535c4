//! In-memory object storage

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{public_url_for, validate_path, ObjectStorage, StorageError};

#[derive(Default)]
pub struct MemoryStorage {
    base_url: String,
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(&(bucket.to_string(), path.to_string())))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        validate_path(path)?;
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        let key = (bucket.to_string(), path.to_string());
        if !overwrite && objects.contains_key(&key) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        objects.insert(key, bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_url_for(&self.base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        for path in paths {
            objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }
}
