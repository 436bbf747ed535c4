//! Availability calendars
//!
//! Month arithmetic, the admin's editable booked-day draft and the public
//! per-date slot view. Nothing in here touches the network.

pub mod draft;
pub mod month;
pub mod public;

use thiserror::Error;

pub use draft::{AvailabilityDraft, DraftDiff};
pub use month::{long_date, parse_date, parse_time, time_label, Month};
pub use public::ANY_TIME;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}
