//! Availability service: admin booked-day drafts and availability slots
//!
//! Each admin session owns one [`AvailabilityDraft`]. Drafts live in process
//! memory and are dropped on sign-out, token expiry or restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    calendar::{parse_date, parse_time, AvailabilityDraft, DraftDiff, Month},
    error::{AppError, AppResult},
    models::{
        availability::{
            AdminMonthView, CreateSlot, NewSlotRow, SaveResponse, SaveStatus, UpdateSlot,
        },
        admin::SessionClaims,
        entity::trimmed,
        AvailabilitySlot, SlotStatus,
    },
    repository::Repository,
};

pub const NO_CHANGES: &str = "No changes to save.";
pub const SAVED: &str = "Availability updated successfully.";
pub const SLOT_EXISTS: &str = "This slot already exists for that date and time.";
pub const SAVE_IN_PROGRESS: &str = "A save is already in progress.";

/// Identifies the draft of one admin session and when its token expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftKey {
    pub session: Uuid,
    /// Unix timestamp after which the draft may be evicted
    pub expires_at: i64,
}

impl From<&SessionClaims> for DraftKey {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            session: claims.jti,
            expires_at: claims.exp,
        }
    }
}

#[derive(Debug)]
struct SessionDraft {
    draft: AvailabilityDraft,
    saving: bool,
    expires_at: i64,
}

type Sessions = Arc<Mutex<HashMap<Uuid, SessionDraft>>>;

/// Evict drafts of expired sessions, then return the draft of `key`
fn session_entry(sessions: &mut HashMap<Uuid, SessionDraft>, key: DraftKey) -> &mut SessionDraft {
    let now = Utc::now().timestamp();
    // a running save still needs its entry
    sessions.retain(|id, s| *id == key.session || s.saving || s.expires_at > now);
    sessions.entry(key.session).or_insert_with(|| SessionDraft {
        draft: AvailabilityDraft::new(),
        saving: false,
        expires_at: key.expires_at,
    })
}

enum WriteFailure {
    /// Nothing reached the store
    Upsert(AppError),
    /// Additions reached the store, removals did not
    Delete(AppError),
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    sessions: Sessions,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn fetch_booked(&self, month: Month) -> AppResult<Vec<NaiveDate>> {
        let rows = self
            .repository
            .booked_days
            .list_between(month.first_day(), month.last_day())
            .await?;
        Ok(rows.into_iter().map(|b| b.date).collect())
    }

    /// Load a month into the session draft and render it
    pub async fn load_month(&self, key: DraftKey, month: Month, force_sync: bool) -> AppResult<AdminMonthView> {
        let fetched = self.fetch_booked(month).await?;

        let mut sessions = self.sessions.lock().await;
        let entry = session_entry(&mut sessions, key);
        entry.draft.apply_month(month, fetched, force_sync);
        Ok(entry.draft.month_view(month))
    }

    /// Flip one date in the draft, loading its month first when needed
    pub async fn toggle(&self, key: DraftKey, date: NaiveDate) -> AppResult<AdminMonthView> {
        let month = Month::of(date);
        let loaded = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(&key.session)
                .map(|s| s.draft.is_loaded(month))
                .unwrap_or(false)
        };
        if !loaded {
            self.load_month(key, month, false).await?;
        }

        let mut sessions = self.sessions.lock().await;
        let entry = session_entry(&mut sessions, key);
        entry.draft.toggle(date);
        Ok(entry.draft.month_view(month))
    }

    /// Throw away unsaved edits of one month
    pub async fn discard(&self, key: DraftKey, month: Month) -> AppResult<AdminMonthView> {
        self.load_month(key, month, true).await
    }

    /// Commit the draft: upsert additions, then delete removals
    ///
    /// The writes run on their own task so a dropped request cannot leave the
    /// session marked as saving.
    pub async fn save(&self, key: DraftKey) -> AppResult<SaveResponse> {
        let session = key.session;
        let diff = {
            let mut sessions = self.sessions.lock().await;
            let entry = session_entry(&mut sessions, key);
            if entry.saving {
                return Err(AppError::Conflict(SAVE_IN_PROGRESS.to_string()));
            }
            let diff = entry.draft.diff();
            if diff.is_empty() {
                return Ok(SaveResponse {
                    status: SaveStatus::NoChanges,
                    message: NO_CHANGES.to_string(),
                    added: Vec::new(),
                    removed: Vec::new(),
                });
            }
            entry.saving = true;
            diff
        };

        let repository = self.repository.clone();
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let outcome = write_diff(&repository, &diff).await;
            finish_save(&sessions, session, diff, outcome).await
        })
        .await
        .map_err(|e| AppError::Internal(format!("Save task failed: {}", e)))?
    }

    /// Forget the session's draft
    pub async fn drop_session(&self, session: Uuid) {
        self.sessions.lock().await.remove(&session);
    }

    // =========================================================================
    // Availability slots
    // =========================================================================

    pub async fn list_slots(&self, month: Month) -> AppResult<Vec<AvailabilitySlot>> {
        self.repository
            .slots
            .list_between(month.first_day(), month.last_day())
            .await
    }

    pub async fn create_slot(&self, data: CreateSlot) -> AppResult<AvailabilitySlot> {
        let date = parse_date(data.date.trim())?;
        let slot_time = if data.is_full_day {
            None
        } else {
            let time = trimmed(data.slot_time).ok_or_else(|| {
                AppError::Validation("Please choose a time or mark the slot as full day.".to_string())
            })?;
            Some(parse_time(&time)?)
        };

        let row = NewSlotRow {
            date,
            slot_time,
            is_full_day: data.is_full_day,
            service_type: trimmed(data.service_type),
            status: data.status.unwrap_or(SlotStatus::Available),
            note: trimmed(data.note),
        };
        let slot = self.repository.slots.create(&row).await.map_err(slot_conflict)?;
        tracing::info!("Availability slot {} created for {}", slot.id, slot.date);
        Ok(slot)
    }

    pub async fn update_slot(&self, id: Uuid, data: UpdateSlot) -> AppResult<AvailabilitySlot> {
        let slot = self.repository.slots.update(id, &data).await.map_err(slot_conflict)?;
        tracing::info!("Availability slot {} updated", id);
        Ok(slot)
    }

    pub async fn delete_slot(&self, id: Uuid) -> AppResult<()> {
        self.repository.slots.delete(id).await?;
        tracing::info!("Availability slot {} deleted", id);
        Ok(())
    }
}

async fn write_diff(repository: &Repository, diff: &DraftDiff) -> Result<(), WriteFailure> {
    repository
        .booked_days
        .upsert_dates(&diff.added, Utc::now())
        .await
        .map_err(WriteFailure::Upsert)?;
    repository
        .booked_days
        .delete_dates(&diff.removed)
        .await
        .map_err(WriteFailure::Delete)?;
    Ok(())
}

async fn finish_save(
    sessions: &Sessions,
    session: Uuid,
    diff: DraftDiff,
    outcome: Result<(), WriteFailure>,
) -> AppResult<SaveResponse> {
    let mut sessions = sessions.lock().await;
    // the session may have signed out while the writes ran
    let entry = sessions.get_mut(&session);

    match outcome {
        Ok(()) => {
            if let Some(entry) = entry {
                entry.saving = false;
                entry.draft.mark_committed(&diff.added, &diff.removed);
            }
            tracing::info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                "Availability saved"
            );
            Ok(SaveResponse {
                status: SaveStatus::Saved,
                message: SAVED.to_string(),
                added: diff.added,
                removed: diff.removed,
            })
        }
        Err(WriteFailure::Upsert(e)) => {
            if let Some(entry) = entry {
                entry.saving = false;
            }
            tracing::warn!("Availability save failed: {}", e);
            Err(e)
        }
        Err(WriteFailure::Delete(e)) => {
            if let Some(entry) = entry {
                entry.saving = false;
                entry.draft.mark_committed(&diff.added, &[]);
            }
            tracing::warn!(
                committed = diff.added.len(),
                "Availability save stopped after additions: {}",
                e
            );
            Err(AppError::PartialSave {
                message: failure_message(e),
                committed: diff.added,
            })
        }
    }
}

fn failure_message(e: AppError) -> String {
    match e {
        AppError::Backend(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn slot_conflict(e: AppError) -> AppError {
    match e {
        AppError::Backend(ref b) if b.is_unique_violation() => AppError::Conflict(SLOT_EXISTS.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MemoryTables, MockTableClient, Row};
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn key() -> DraftKey {
        DraftKey {
            session: Uuid::new_v4(),
            expires_at: Utc::now().timestamp() + 3600,
        }
    }

    fn march() -> Month {
        Month::new(2024, 3).unwrap()
    }

    fn memory_service() -> (Repository, AvailabilityService) {
        let repository = Repository::new(Arc::new(MemoryTables::new()));
        (repository.clone(), AvailabilityService::new(repository))
    }

    fn booked_row(date: &str) -> Row {
        crate::backend::to_row(&json!({
            "id": Uuid::new_v4().to_string(),
            "date": date,
            "note": null,
            "updated_at": null,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_minimal_diff() {
        let (repository, service) = memory_service();
        repository
            .booked_days
            .upsert_dates(&[d("2024-03-05"), d("2024-03-06")], Utc::now())
            .await
            .unwrap();
        let session = key();

        service.load_month(session, march(), false).await.unwrap();
        service.toggle(session, d("2024-03-05")).await.unwrap();
        let view = service.toggle(session, d("2024-03-07")).await.unwrap();
        assert!(view.dirty);
        assert_eq!(view.booked_count, 2);

        let saved = service.save(session).await.unwrap();
        assert_eq!(saved.status, SaveStatus::Saved);
        assert_eq!(saved.message, SAVED);
        assert_eq!(saved.added, vec![d("2024-03-07")]);
        assert_eq!(saved.removed, vec![d("2024-03-05")]);

        let stored: Vec<NaiveDate> = repository
            .booked_days
            .list_between(d("2024-03-01"), d("2024-03-31"))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.date)
            .collect();
        assert_eq!(stored, vec![d("2024-03-06"), d("2024-03-07")]);

        let view = service.load_month(session, march(), false).await.unwrap();
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn test_edits_survive_month_switch_and_discard_is_scoped() {
        let (_, service) = memory_service();
        let session = key();

        service.toggle(session, d("2024-03-10")).await.unwrap();
        let april = service.toggle(session, d("2024-04-02")).await.unwrap();
        assert!(april.month_dirty);

        // viewing March again keeps its edit
        let view = service.load_month(session, march(), false).await.unwrap();
        assert!(view.month_dirty);
        assert!(view.days[9].booked);

        let view = service.discard(session, march()).await.unwrap();
        assert!(!view.month_dirty);
        assert!(view.dirty);
        assert_eq!(view.booked_count, 0);

        let april = service
            .load_month(session, Month::new(2024, 4).unwrap(), false)
            .await
            .unwrap();
        assert!(april.days[1].booked);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (_, service) = memory_service();
        let a = key();
        let b = key();
        service.toggle(a, d("2024-03-10")).await.unwrap();

        let view = service.load_month(b, march(), false).await.unwrap();
        assert!(!view.dirty);

        service.drop_session(a.session).await;
        let view = service.load_month(a, march(), false).await.unwrap();
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn test_expired_session_drafts_are_evicted() {
        let (_, service) = memory_service();
        let now = Utc::now().timestamp();
        let stale: Vec<DraftKey> = (0..20)
            .map(|_| DraftKey {
                session: Uuid::new_v4(),
                expires_at: now - 60,
            })
            .collect();
        for k in &stale {
            service.toggle(*k, d("2024-03-10")).await.unwrap();
        }

        let live = key();
        service.load_month(live, march(), false).await.unwrap();

        let sessions = service.sessions.lock().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&live.session));
        assert!(stale.iter().all(|k| !sessions.contains_key(&k.session)));
    }

    #[tokio::test]
    async fn test_saving_session_survives_eviction() {
        let (_, service) = memory_service();
        let expired = DraftKey {
            session: Uuid::new_v4(),
            expires_at: Utc::now().timestamp() - 60,
        };
        service.toggle(expired, d("2024-03-10")).await.unwrap();
        service.sessions.lock().await.get_mut(&expired.session).unwrap().saving = true;

        service.load_month(key(), march(), false).await.unwrap();
        assert!(service.sessions.lock().await.contains_key(&expired.session));
    }

    #[tokio::test]
    async fn test_noop_save_performs_no_writes() {
        let mut client = MockTableClient::new();
        client
            .expect_select()
            .returning(|_, _| Ok(vec![booked_row("2024-03-05")]));
        client.expect_upsert().never();
        client.expect_delete().never();

        let service = AvailabilityService::new(Repository::new(Arc::new(client)));
        let session = key();
        service.load_month(session, march(), false).await.unwrap();
        service.toggle(session, d("2024-03-09")).await.unwrap();
        service.toggle(session, d("2024-03-09")).await.unwrap();

        let saved = service.save(session).await.unwrap();
        assert_eq!(saved.status, SaveStatus::NoChanges);
        assert_eq!(saved.message, NO_CHANGES);
    }

    #[tokio::test]
    async fn test_failed_delete_reports_committed_additions() {
        let mut client = MockTableClient::new();
        client
            .expect_select()
            .returning(|_, _| Ok(vec![booked_row("2024-03-05")]));
        client
            .expect_upsert()
            .times(1)
            .returning(|_, rows, _| {
                Ok(rows
                    .into_iter()
                    .map(|mut row| {
                        row.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
                        row
                    })
                    .collect())
            });
        client
            .expect_delete()
            .times(1)
            .returning(|_, _| Err(BackendError::Request("permission denied for table booked_days".to_string())));

        let service = AvailabilityService::new(Repository::new(Arc::new(client)));
        let session = key();
        service.load_month(session, march(), false).await.unwrap();
        service.toggle(session, d("2024-03-05")).await.unwrap();
        service.toggle(session, d("2024-03-07")).await.unwrap();

        match service.save(session).await.unwrap_err() {
            AppError::PartialSave { message, committed } => {
                assert_eq!(message, "permission denied for table booked_days");
                assert_eq!(committed, vec![d("2024-03-07")]);
            }
            other => panic!("unexpected {:?}", other),
        }

        // only the removal is still pending
        let diff = {
            let sessions = service.sessions.lock().await;
            let entry = sessions.get(&session.session).unwrap();
            assert!(!entry.saving);
            entry.draft.diff()
        };
        assert!(diff.added.is_empty());
        assert_eq!(diff.removed, vec![d("2024-03-05")]);
    }

    #[tokio::test]
    async fn test_failed_upsert_skips_delete() {
        let mut client = MockTableClient::new();
        client
            .expect_select()
            .returning(|_, _| Ok(vec![booked_row("2024-03-05")]));
        client
            .expect_upsert()
            .returning(|_, _, _| Err(BackendError::Request("network error".to_string())));
        client.expect_delete().never();

        let service = AvailabilityService::new(Repository::new(Arc::new(client)));
        let session = key();
        service.load_month(session, march(), false).await.unwrap();
        service.toggle(session, d("2024-03-05")).await.unwrap();
        service.toggle(session, d("2024-03-07")).await.unwrap();

        let err = service.save(session).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        let sessions = service.sessions.lock().await;
        assert!(sessions.get(&session.session).unwrap().draft.is_dirty());
    }

    #[tokio::test]
    async fn test_save_in_progress_is_rejected() {
        let (_, service) = memory_service();
        let session = key();
        service.toggle(session, d("2024-03-10")).await.unwrap();
        service.sessions.lock().await.get_mut(&session.session).unwrap().saving = true;

        let err = service.save(session).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == SAVE_IN_PROGRESS));
    }

    #[tokio::test]
    async fn test_duplicate_slot_is_reported() {
        let (_, service) = memory_service();
        let slot = || CreateSlot {
            date: "2024-03-10".to_string(),
            slot_time: Some("10:00".to_string()),
            is_full_day: false,
            service_type: Some("wedding".to_string()),
            status: None,
            note: None,
        };
        let created = service.create_slot(slot()).await.unwrap();
        assert_eq!(created.status, SlotStatus::Available);

        match service.create_slot(slot()).await.unwrap_err() {
            AppError::Conflict(msg) => assert_eq!(msg, SLOT_EXISTS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_day_slot_ignores_time() {
        let (_, service) = memory_service();
        let full_day = || CreateSlot {
            date: "2024-03-10".to_string(),
            slot_time: Some("09:00".to_string()),
            is_full_day: true,
            service_type: None,
            status: Some(SlotStatus::Booked),
            note: Some("  ".to_string()),
        };
        let slot = service.create_slot(full_day()).await.unwrap();
        assert_eq!(slot.slot_time, None);
        assert_eq!(slot.note, None);
        assert!(slot.blocks_day());

        // a second full day on the same date collides even with a null time
        let err = service.create_slot(full_day()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_timed_slot_requires_time() {
        let (_, service) = memory_service();
        let err = service
            .create_slot(CreateSlot {
                date: "2024-03-10".to_string(),
                slot_time: None,
                is_full_day: false,
                service_type: None,
                status: None,
                note: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_slot() {
        let (_, service) = memory_service();
        let slot = service
            .create_slot(CreateSlot {
                date: "2024-03-10".to_string(),
                slot_time: Some("14:30".to_string()),
                is_full_day: false,
                service_type: None,
                status: None,
                note: None,
            })
            .await
            .unwrap();

        let updated = service
            .update_slot(
                slot.id,
                UpdateSlot {
                    status: Some(SlotStatus::Booked),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, SlotStatus::Booked);

        let listed = service.list_slots(march()).await.unwrap();
        assert_eq!(listed.len(), 1);

        service.delete_slot(slot.id).await.unwrap();
        assert!(matches!(service.delete_slot(slot.id).await, Err(AppError::NotFound(_))));
    }
}
