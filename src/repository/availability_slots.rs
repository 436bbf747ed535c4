//! Availability slots repository

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    backend::{from_rows, to_row, Filter, Query, TableClient},
    error::{AppError, AppResult},
    models::availability::{AvailabilitySlot, NewSlotRow, UpdateSlot},
};

const TABLE: &str = "availability_slots";

#[derive(Clone)]
pub struct AvailabilitySlotsRepository {
    client: Arc<dyn TableClient>,
}

fn by_id(id: Uuid) -> Filter {
    Filter::Eq("id".to_string(), id.to_string().into())
}

impl AvailabilitySlotsRepository {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    /// Slots in a date range, ordered by date, full-day first, then time
    pub async fn list_between(&self, first: NaiveDate, last: NaiveDate) -> AppResult<Vec<AvailabilitySlot>> {
        let query = Query::new()
            .gte("date", first.to_string())
            .lte("date", last.to_string())
            .asc("date")
            .desc("is_full_day")
            .asc("slot_time");
        let rows = self.client.select(TABLE, &query).await?;
        Ok(from_rows(rows)?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AvailabilitySlot> {
        let query = Query::new().eq("id", id.to_string());
        from_rows(self.client.select(TABLE, &query).await?)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Slot {} not found", id)))
    }

    pub async fn create(&self, slot: &NewSlotRow) -> AppResult<AvailabilitySlot> {
        let rows = self.client.insert(TABLE, vec![to_row(slot)?]).await?;
        from_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Insert returned no row".to_string()))
    }

    pub async fn update(&self, id: Uuid, data: &UpdateSlot) -> AppResult<AvailabilitySlot> {
        let patch = to_row(data)?;
        if patch.is_empty() {
            return self.get(id).await;
        }
        from_rows(self.client.update(TABLE, patch, &[by_id(id)]).await?)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Slot {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed = self.client.delete(TABLE, &[by_id(id)]).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Slot {} not found", id)));
        }
        Ok(())
    }
}
