//! Booked days repository

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    backend::{from_rows, to_row, Filter, Query, TableClient},
    error::AppResult,
    models::availability::{BookedDay, BookedDayUpsert},
};

const TABLE: &str = "booked_days";

#[derive(Clone)]
pub struct BookedDaysRepository {
    client: Arc<dyn TableClient>,
}

impl BookedDaysRepository {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    /// Booked days with `first <= date <= last`, ordered by date
    pub async fn list_between(&self, first: NaiveDate, last: NaiveDate) -> AppResult<Vec<BookedDay>> {
        let query = Query::new()
            .gte("date", first.to_string())
            .lte("date", last.to_string())
            .asc("date");
        let rows = self.client.select(TABLE, &query).await?;
        Ok(from_rows(rows)?)
    }

    /// Mark dates booked; an existing row for a date is refreshed
    pub async fn upsert_dates(&self, dates: &[NaiveDate], now: DateTime<Utc>) -> AppResult<Vec<BookedDay>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let rows = dates
            .iter()
            .map(|date| {
                to_row(&BookedDayUpsert {
                    date: *date,
                    note: None,
                    updated_at: now,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let written = self
            .client
            .upsert(TABLE, rows, &["date".to_string()])
            .await?;
        Ok(from_rows(written)?)
    }

    /// Make dates available again
    pub async fn delete_dates(&self, dates: &[NaiveDate]) -> AppResult<u64> {
        if dates.is_empty() {
            return Ok(0);
        }
        let filter = Filter::In(
            "date".to_string(),
            dates.iter().map(|d| d.to_string().into()).collect(),
        );
        Ok(self.client.delete(TABLE, &[filter]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryTables;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_upsert_list_delete() {
        let repo = BookedDaysRepository::new(Arc::new(MemoryTables::new()));
        let now = Utc::now();

        repo.upsert_dates(&[d("2024-03-07"), d("2024-03-05"), d("2024-04-01")], now)
            .await
            .unwrap();
        // upserting the same date again does not conflict
        repo.upsert_dates(&[d("2024-03-05")], now).await.unwrap();

        let march = repo.list_between(d("2024-03-01"), d("2024-03-31")).await.unwrap();
        let dates: Vec<NaiveDate> = march.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d("2024-03-05"), d("2024-03-07")]);

        let removed = repo.delete_dates(&[d("2024-03-05"), d("2024-03-20")]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.list_between(d("2024-03-01"), d("2024-03-31")).await.unwrap().len(), 1);
    }
}
