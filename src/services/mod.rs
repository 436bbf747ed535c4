//! Business logic services

pub mod auth;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod media;
pub mod pages;
pub mod settings;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository, storage::ObjectStorage};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub availability: availability::AvailabilityService,
    pub calendar: calendar::CalendarService,
    pub booking: booking::BookingService,
    pub catalog: catalog::CatalogService,
    pub settings: settings::SettingsService,
    pub pages: pages::PagesService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository and object storage
    pub fn new(repository: Repository, storage: Arc<dyn ObjectStorage>, config: &AppConfig) -> Self {
        let media = media::MediaService::new(storage);
        let settings = settings::SettingsService::new(
            repository.clone(),
            media.clone(),
            Arc::new(config.site.clone()),
        );
        let availability = availability::AvailabilityService::new(repository.clone());

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone(), availability.clone()),
            calendar: calendar::CalendarService::new(repository.clone()),
            booking: booking::BookingService::new(settings.clone(), repository.entities()),
            catalog: catalog::CatalogService::new(&repository, media),
            pages: pages::PagesService::new(&repository, settings.clone()),
            availability,
            settings,
            repository,
        }
    }

    /// Backend connectivity check used by the readiness endpoint
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
