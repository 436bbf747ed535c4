//! Public booking calendar
//!
//! Visitors only see whole-day status. A day turns fully booked when any of
//! its slots is a booked full-day slot; booked time slots alone never block
//! the day. Dates without slots are available.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::month::{long_date, time_label, Month};
use crate::models::availability::{
    AvailabilitySlot, DayAvailability, DayStatus, PublicDay, PublicMonthView, SlotStatus, SlotView,
};

/// Time passed to the booking step when a visitor picks a date
pub const ANY_TIME: &str = "Any Time";

pub const FULL_DAY: &str = "Full Day";

pub fn group_by_date(slots: Vec<AvailabilitySlot>) -> BTreeMap<NaiveDate, Vec<AvailabilitySlot>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<AvailabilitySlot>> = BTreeMap::new();
    for slot in slots {
        grouped.entry(slot.date).or_default().push(slot);
    }
    grouped
}

pub fn day_status(slots: &[AvailabilitySlot]) -> DayStatus {
    if slots.iter().any(AvailabilitySlot::blocks_day) {
        DayStatus::FullyBooked
    } else {
        DayStatus::Available
    }
}

/// Full-day slots first, then by time
pub fn sort_slots(slots: &mut [AvailabilitySlot]) {
    slots.sort_by_key(|slot| (!slot.is_full_day, slot.slot_time));
}

pub fn slot_label(slot: &AvailabilitySlot) -> String {
    if slot.is_full_day {
        FULL_DAY.to_string()
    } else {
        slot.slot_time.map(time_label).unwrap_or_else(|| "00:00".to_string())
    }
}

pub fn month_view(month: Month, slots: Vec<AvailabilitySlot>) -> PublicMonthView {
    let grouped = group_by_date(slots);
    let days = month
        .days()
        .map(|date| {
            let day_slots = grouped.get(&date).map(Vec::as_slice).unwrap_or_default();
            PublicDay {
                date,
                day: date.day(),
                status: day_status(day_slots),
                slot_count: day_slots.len(),
            }
        })
        .collect();

    PublicMonthView {
        month: month.key(),
        label: month.label(),
        leading_blanks: month.leading_blanks(),
        days,
        prev_month: month.prev().key(),
        next_month: month.next().key(),
    }
}

/// Details of one date; `slots` may include other dates, which are ignored
pub fn day_availability(date: NaiveDate, slots: Vec<AvailabilitySlot>) -> DayAvailability {
    let mut day_slots: Vec<AvailabilitySlot> = slots.into_iter().filter(|s| s.date == date).collect();
    sort_slots(&mut day_slots);

    let status = day_status(&day_slots);
    let event_type = day_slots.iter().find_map(|s| s.service_type.clone());
    let views = day_slots
        .iter()
        .map(|slot| SlotView {
            time: slot_label(slot),
            status: if status == DayStatus::FullyBooked {
                SlotStatus::Booked
            } else {
                slot.status
            },
        })
        .collect();

    DayAvailability {
        date,
        label: long_date(date),
        status,
        slots: views,
        event_type,
        selected_time: ANY_TIME.to_string(),
    }
}
