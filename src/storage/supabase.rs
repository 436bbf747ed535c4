//! Supabase storage REST adapter

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::{public_url_for, validate_path, ObjectStorage, StorageError};

#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }
}

/// Pull the `message` out of a storage error body, falling back to the raw text
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("Storage request failed ({}): {}", status, text))
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        validate_path(path)?;
        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", if overwrite { "true" } else { "false" })
            .header("cache-control", "max-age=3600")
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(StorageError::AlreadyExists(path.to_string())),
            _ => {
                let message = error_message(response).await;
                if message.contains("already exists") || message.contains("Duplicate") {
                    Err(StorageError::AlreadyExists(path.to_string()))
                } else {
                    Err(StorageError::Request(message))
                }
            }
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_url_for(&self.base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, bucket))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::Request(error_message(response).await))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let storage = SupabaseStorage::new("https://abc.supabase.co/", "key");
        assert_eq!(
            storage.object_url("gallery", "gallery/event/1.jpg"),
            "https://abc.supabase.co/storage/v1/object/gallery/gallery/event/1.jpg"
        );
        assert_eq!(
            storage.public_url("gallery", "gallery/event/1.jpg"),
            "https://abc.supabase.co/storage/v1/object/public/gallery/gallery/event/1.jpg"
        );
    }
}
