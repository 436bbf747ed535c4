//! Public booking calendar service

use chrono::NaiveDate;

use crate::{
    calendar::{public, Month},
    error::AppResult,
    models::availability::{DayAvailability, PublicMonthView},
    repository::Repository,
};

#[derive(Clone)]
pub struct CalendarService {
    repository: Repository,
}

impl CalendarService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Whole-day status of every date in `month`
    pub async fn month(&self, month: Month) -> AppResult<PublicMonthView> {
        let slots = self
            .repository
            .slots
            .list_between(month.first_day(), month.last_day())
            .await?;
        Ok(public::month_view(month, slots))
    }

    /// Published slots of one date
    pub async fn day(&self, date: NaiveDate) -> AppResult<DayAvailability> {
        let slots = self.repository.slots.list_between(date, date).await?;
        Ok(public::day_availability(date, slots))
    }
}
