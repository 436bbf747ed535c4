//! Site settings repository

use std::sync::Arc;

use crate::{
    backend::{from_rows, Query, Row, TableClient},
    error::{AppError, AppResult},
    models::settings::{SiteSettings, SETTINGS_ID},
};

const TABLE: &str = "site_settings";

#[derive(Clone)]
pub struct SettingsRepository {
    client: Arc<dyn TableClient>,
}

impl SettingsRepository {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    /// The settings row; an empty one when it was never written
    pub async fn get(&self) -> AppResult<SiteSettings> {
        let query = Query::new().eq("id", SETTINGS_ID);
        let rows = self.client.select(TABLE, &query).await?;
        Ok(from_rows::<SiteSettings>(rows)?
            .into_iter()
            .next()
            .unwrap_or_else(|| SiteSettings {
                id: SETTINGS_ID,
                ..SiteSettings::default()
            }))
    }

    /// Write `fields` onto the singleton row, creating it if needed
    pub async fn save(&self, mut fields: Row) -> AppResult<SiteSettings> {
        fields.insert("id".to_string(), SETTINGS_ID.into());
        let rows = self
            .client
            .upsert(TABLE, vec![fields], &["id".to_string()])
            .await?;
        from_rows::<SiteSettings>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Settings upsert returned no row".to_string()))
    }
}
