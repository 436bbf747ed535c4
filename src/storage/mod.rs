//! Object storage for uploaded images
//!
//! Objects are addressed by `(bucket, path)`. Public URLs follow the
//! `<base>/storage/v1/object/public/<bucket>/<path>` layout whatever the
//! implementation, which is what lets a legacy row without a stored path be
//! mapped back to its object.

pub mod local;
pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use supabase::SupabaseStorage;

/// URL segment between the storage base URL and `<bucket>/<path>`
pub const PUBLIC_PREFIX: &str = "/storage/v1/object/public";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("The resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Request(String),
}

/// Object storage API of the hosted backend
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path`; without `overwrite` an existing object is an error
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        overwrite: bool,
    ) -> Result<(), StorageError>;

    /// Public URL of an object (no existence check)
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove objects; missing objects are not an error
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;
}

/// Join a base URL, bucket and path into a public URL
pub fn public_url_for(base_url: &str, bucket: &str, path: &str) -> String {
    format!("{}{}/{}/{}", base_url.trim_end_matches('/'), PUBLIC_PREFIX, bucket, path)
}

/// Recover the object path from a public URL, for rows stored without one
pub fn path_from_public_url(bucket: &str, url: &str) -> Option<String> {
    let marker = format!("{}/{}/", PUBLIC_PREFIX, bucket);
    let idx = url.find(&marker)?;
    let path = &url[idx + marker.len()..];
    let path = path.split(['?', '#']).next().unwrap_or_default();
    // object keys are stored decoded
    let path = urlencoding::decode(path).ok()?;
    if path.is_empty() {
        None
    } else {
        Some(path.into_owned())
    }
}

/// Relative object path: no traversal, no absolute paths, no empty segments
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        Err(StorageError::InvalidPath(path.to_string()))
    } else {
        Ok(())
    }
}

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\-_]").expect("valid regex"));
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// File-name friendly slug: accents stripped, lowercase, dash separated
pub fn seo_file_slug(input: &str) -> String {
    let folded: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    let dashed = WHITESPACE.replace_all(folded.trim(), "-");
    let cleaned = NON_SLUG.replace_all(&dashed, "");
    let collapsed = DASHES.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Lowercased extension of `filename`, `jpg` when there is none
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => "jpg".to_string(),
    }
}

fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => filename,
    }
}

/// `gallery/<category>/<millis>_<name>_<rand>.<ext>`
pub fn gallery_object_path(category: Option<&str>, filename: &str, now: DateTime<Utc>) -> String {
    let category = Some(seo_file_slug(category.unwrap_or("general")))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "general".to_string());
    let name = Some(seo_file_slug(file_stem(filename)))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    let rand: String = uuid::Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!(
        "gallery/{}/{}_{}_{}.{}",
        category,
        now.timestamp_millis(),
        name,
        rand,
        file_extension(filename)
    )
}

/// `<category>/<millis>-<title>.<ext>`
pub fn portfolio_object_path(category: &str, title: &str, filename: &str, now: DateTime<Utc>) -> String {
    let base = if title.trim().is_empty() { file_stem(filename) } else { title };
    let name = Some(seo_file_slug(base))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "photo".to_string());
    let category = Some(seo_file_slug(category))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "general".to_string());
    format!("{}/{}-{}.{}", category, now.timestamp_millis(), name, file_extension(filename))
}

/// `<folder>/<name>-<millis>.<ext>` for site assets (logo, banner)
pub fn asset_object_path(folder: &str, filename: &str, now: DateTime<Utc>) -> String {
    let name = Some(seo_file_slug(file_stem(filename)))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| folder.to_string());
    format!("{}/{}-{}.{}", folder, name, now.timestamp_millis(), file_extension(filename))
}
