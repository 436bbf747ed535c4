//! Studio Server
//!
//! Back-office and public API of a photography studio site: a booked-days
//! calendar edited through per-session drafts, time slots, packages,
//! portfolio and gallery images, WhatsApp booking links and page metadata.

use std::sync::Arc;

pub mod api;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seo;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
