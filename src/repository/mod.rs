//! Repository layer for table access

pub mod admins;
pub mod availability_slots;
pub mod booked_days;
pub mod entities;
pub mod settings;

use std::sync::Arc;

use crate::{backend::TableClient, models::Entity};

/// Main repository struct holding the table client
#[derive(Clone)]
pub struct Repository {
    pub client: Arc<dyn TableClient>,
    pub booked_days: booked_days::BookedDaysRepository,
    pub slots: availability_slots::AvailabilitySlotsRepository,
    pub settings: settings::SettingsRepository,
    pub admins: admins::AdminsRepository,
}

impl Repository {
    /// Create a new repository over the given table client
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self {
            booked_days: booked_days::BookedDaysRepository::new(client.clone()),
            slots: availability_slots::AvailabilitySlotsRepository::new(client.clone()),
            settings: settings::SettingsRepository::new(client.clone()),
            admins: admins::AdminsRepository::new(client.clone()),
            client,
        }
    }

    /// Repository for one admin-managed record kind
    pub fn entities<E: Entity>(&self) -> entities::EntitiesRepository<E> {
        entities::EntitiesRepository::new(self.client.clone())
    }

    /// Backend connectivity check
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.client.ping().await?;
        Ok(())
    }
}
