//! Availability models (booked days, availability slots, calendar views)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// BookedDay
// ---------------------------------------------------------------------------

/// A whole day marked unavailable. No row means the day is available.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookedDay {
    pub id: Uuid,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row written when a day is (re)booked; the conflict target is `date`
#[derive(Debug, Serialize)]
pub struct BookedDayUpsert {
    pub date: NaiveDate,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// One cell of the admin month grid
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDay {
    pub date: NaiveDate,
    pub day: u32,
    /// Booked in the draft
    pub booked: bool,
    /// Draft differs from the committed state for this date
    pub changed: bool,
}

/// Admin calendar month, rendered from the session draft
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminMonthView {
    /// Month key (YYYY-MM)
    pub month: String,
    /// Display label, e.g. "March 2024"
    pub label: String,
    /// Empty cells before day 1 (Sunday-first grid)
    pub leading_blanks: u32,
    pub days: Vec<AdminDay>,
    /// Unsaved changes in any month of the session
    pub dirty: bool,
    /// Unsaved changes in this month
    pub month_dirty: bool,
    /// Booked days this month (draft)
    pub booked_count: usize,
    /// Keys of the neighbouring months, for navigation
    pub prev_month: String,
    pub next_month: String,
}

/// Query selecting a calendar month
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month (YYYY-MM), defaults to the current month
    pub month: Option<String>,
}

/// Toggle one date in the draft
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleDayRequest {
    /// Date (YYYY-MM-DD)
    pub date: String,
}

/// Discard the draft of one month
#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscardMonthRequest {
    /// Month (YYYY-MM)
    pub month: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    NoChanges,
    Saved,
}

/// Result of saving the draft
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveResponse {
    pub status: SaveStatus,
    pub message: String,
    /// Dates newly marked booked
    pub added: Vec<NaiveDate>,
    /// Dates made available again
    pub removed: Vec<NaiveDate>,
}

// ---------------------------------------------------------------------------
// AvailabilitySlot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
}

/// A time slot (or full day) on a date
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Null for full-day slots
    pub slot_time: Option<NaiveTime>,
    pub is_full_day: bool,
    /// Photography type slug
    pub service_type: Option<String>,
    pub status: SlotStatus,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AvailabilitySlot {
    /// Booked full-day slot, which blocks the whole date
    pub fn blocks_day(&self) -> bool {
        self.is_full_day && self.status == SlotStatus::Booked
    }
}

/// Create slot request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSlot {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Time (HH:MM), required unless `is_full_day`
    pub slot_time: Option<String>,
    #[serde(default)]
    pub is_full_day: bool,
    pub service_type: Option<String>,
    pub status: Option<SlotStatus>,
    pub note: Option<String>,
}

/// Row inserted for a new slot
#[derive(Debug, Serialize)]
pub struct NewSlotRow {
    pub date: NaiveDate,
    pub slot_time: Option<NaiveTime>,
    pub is_full_day: bool,
    pub service_type: Option<String>,
    pub status: SlotStatus,
    pub note: Option<String>,
}

/// Update slot request
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSlot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Public calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    FullyBooked,
}

/// One cell of the public month grid
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicDay {
    pub date: NaiveDate,
    pub day: u32,
    pub status: DayStatus,
    /// Number of slots the studio published for the date
    pub slot_count: usize,
}

/// Public calendar month
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicMonthView {
    pub month: String,
    pub label: String,
    pub leading_blanks: u32,
    pub days: Vec<PublicDay>,
    pub prev_month: String,
    pub next_month: String,
}

/// A published slot as shown to visitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SlotView {
    /// "Full Day" or "HH:MM"
    pub time: String,
    /// Booked when the slot is booked or the whole day is blocked
    pub status: SlotStatus,
}

/// Availability details of a selected date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Long label, e.g. "Sunday, March 10, 2024"
    pub label: String,
    pub status: DayStatus,
    pub slots: Vec<SlotView>,
    /// First service type found on the date's slots
    pub event_type: Option<String>,
    /// Time carried forward to the booking step
    pub selected_time: String,
}
