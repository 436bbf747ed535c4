//! Admin availability draft
//!
//! An admin edits booked days locally and commits them in one save. The
//! draft keeps two sets of dates: `server`, what the store last reported for
//! every month touched, and `local`, the editable copy. Both are filled one
//! month at a time, so switching months never throws away edits made in
//! another month.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::month::Month;
use crate::models::availability::{AdminDay, AdminMonthView};

/// Dates to write on save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftDiff {
    /// Booked locally, not on the server
    pub added: Vec<NaiveDate>,
    /// Booked on the server, cleared locally
    pub removed: Vec<NaiveDate>,
}

impl DraftDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityDraft {
    server: BTreeSet<NaiveDate>,
    local: BTreeSet<NaiveDate>,
    loaded: BTreeSet<Month>,
}

impl AvailabilityDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, month: Month) -> bool {
        self.loaded.contains(&month)
    }

    /// Merge booked dates fetched for `month`
    ///
    /// The server slice is always replaced. The local slice is replaced only
    /// on the first load of the month or when `force_sync` is set, which is
    /// how a month's unsaved edits get discarded.
    pub fn apply_month<I>(&mut self, month: Month, fetched: I, force_sync: bool)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let fetched: BTreeSet<NaiveDate> = fetched.into_iter().filter(|d| month.contains(*d)).collect();
        let first_load = self.loaded.insert(month);

        replace_slice(&mut self.server, month, &fetched);
        if first_load || force_sync {
            replace_slice(&mut self.local, month, &fetched);
        }
    }

    /// Flip a date in the local set; returns whether it is now booked
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.local.remove(&date) {
            false
        } else {
            self.local.insert(date);
            true
        }
    }

    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.local.contains(&date)
    }

    /// Local edits differ from the server state in any month
    pub fn is_dirty(&self) -> bool {
        self.local != self.server
    }

    pub fn is_month_dirty(&self, month: Month) -> bool {
        slice(&self.local, month).ne(slice(&self.server, month))
    }

    pub fn booked_count(&self, month: Month) -> usize {
        slice(&self.local, month).count()
    }

    pub fn diff(&self) -> DraftDiff {
        DraftDiff {
            added: self.local.difference(&self.server).copied().collect(),
            removed: self.server.difference(&self.local).copied().collect(),
        }
    }

    /// Fold writes that reached the store into the server set
    pub fn mark_committed(&mut self, added: &[NaiveDate], removed: &[NaiveDate]) {
        self.server.extend(added.iter().copied());
        for date in removed {
            self.server.remove(date);
        }
    }

    pub fn month_view(&self, month: Month) -> AdminMonthView {
        let days = month
            .days()
            .map(|date| {
                let booked = self.local.contains(&date);
                AdminDay {
                    date,
                    day: date.day(),
                    booked,
                    changed: booked != self.server.contains(&date),
                }
            })
            .collect();

        AdminMonthView {
            month: month.key(),
            label: month.label(),
            leading_blanks: month.leading_blanks(),
            days,
            dirty: self.is_dirty(),
            month_dirty: self.is_month_dirty(month),
            booked_count: self.booked_count(month),
            prev_month: month.prev().key(),
            next_month: month.next().key(),
        }
    }
}

fn slice(set: &BTreeSet<NaiveDate>, month: Month) -> impl Iterator<Item = &NaiveDate> {
    set.range(month.first_day()..=month.last_day())
}

fn replace_slice(set: &mut BTreeSet<NaiveDate>, month: Month, fetched: &BTreeSet<NaiveDate>) {
    set.retain(|d| !month.contains(*d));
    set.extend(fetched.iter().copied());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::month::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn m(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn test_unloaded_dates_are_available() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![], false);
        let view = draft.month_view(m("2024-03"));
        assert_eq!(view.days.len(), 31);
        assert!(view.days.iter().all(|day| !day.booked && !day.changed));
        assert!(!view.dirty);
        assert_eq!(view.booked_count, 0);
    }

    #[test]
    fn test_toggle_twice_is_clean() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![d("2024-03-05")], false);
        assert!(!draft.is_dirty());

        assert!(draft.toggle(d("2024-03-07")));
        assert!(draft.is_dirty());
        assert!(!draft.toggle(d("2024-03-07")));
        assert!(!draft.is_dirty());

        assert!(!draft.toggle(d("2024-03-05")));
        assert!(draft.is_dirty());
        assert!(draft.toggle(d("2024-03-05")));
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_diff_is_minimal() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-01"), vec![d("2024-01-05"), d("2024-01-06")], false);
        draft.toggle(d("2024-01-05"));
        draft.toggle(d("2024-01-07"));

        let diff = draft.diff();
        assert_eq!(diff.added, vec![d("2024-01-07")]);
        assert_eq!(diff.removed, vec![d("2024-01-05")]);
    }

    #[test]
    fn test_clean_draft_has_empty_diff() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-01"), vec![d("2024-01-05")], false);
        assert!(draft.diff().is_empty());
    }

    #[test]
    fn test_month_edits_survive_switching() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![], false);
        draft.toggle(d("2024-03-10"));

        // view April, then come back: the refetch must not drop March edits
        draft.apply_month(m("2024-04"), vec![d("2024-04-02")], false);
        draft.apply_month(m("2024-03"), vec![], false);
        assert!(draft.is_booked(d("2024-03-10")));
        assert!(draft.is_month_dirty(m("2024-03")));
        assert!(!draft.is_month_dirty(m("2024-04")));
    }

    #[test]
    fn test_discard_resets_only_that_month() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![], false);
        draft.apply_month(m("2024-04"), vec![], false);
        draft.toggle(d("2024-03-10"));
        draft.toggle(d("2024-04-11"));

        draft.apply_month(m("2024-03"), vec![], true);
        assert!(!draft.is_booked(d("2024-03-10")));
        assert!(draft.is_booked(d("2024-04-11")));
        assert!(!draft.is_month_dirty(m("2024-03")));
        assert!(draft.is_dirty());
    }

    #[test]
    fn test_refetch_updates_server_slice() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![], false);
        // another admin booked the 12th meanwhile
        draft.apply_month(m("2024-03"), vec![d("2024-03-12")], false);
        assert!(!draft.is_booked(d("2024-03-12")));
        assert_eq!(draft.diff().removed, vec![d("2024-03-12")]);
    }

    #[test]
    fn test_fetched_rows_outside_month_are_ignored() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![d("2024-04-01")], false);
        assert!(!draft.is_booked(d("2024-04-01")));
    }

    #[test]
    fn test_mark_committed() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-01"), vec![d("2024-01-05")], false);
        draft.toggle(d("2024-01-05"));
        draft.toggle(d("2024-01-07"));

        // additions reached the store, removals failed
        draft.mark_committed(&[d("2024-01-07")], &[]);
        let diff = draft.diff();
        assert!(diff.added.is_empty());
        assert_eq!(diff.removed, vec![d("2024-01-05")]);

        draft.mark_committed(&[], &[d("2024-01-05")]);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_month_view_flags() {
        let mut draft = AvailabilityDraft::new();
        draft.apply_month(m("2024-03"), vec![d("2024-03-01")], false);
        draft.toggle(d("2024-03-02"));

        let view = draft.month_view(m("2024-03"));
        assert_eq!(view.month, "2024-03");
        assert_eq!(view.label, "March 2024");
        assert_eq!(view.leading_blanks, 5);
        assert_eq!(view.prev_month, "2024-02");
        assert_eq!(view.next_month, "2024-04");
        assert_eq!(view.booked_count, 2);
        assert!(view.dirty && view.month_dirty);

        let first = &view.days[0];
        assert_eq!(first.day, 1);
        assert!(first.booked && !first.changed);
        let second = &view.days[1];
        assert!(second.booked && second.changed);
    }
}
