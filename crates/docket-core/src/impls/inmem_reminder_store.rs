//! InMemoryReminderStore - development / test store.
//!
//! One `tokio::sync::Mutex` around a `HashMap`. The guard check and the write
//! in `put` happen under the same lock, which is the in-memory equivalent of a
//! single `UPDATE .. WHERE status = ? AND revision = ?` statement.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{ReminderId, WorkItemId};
use crate::domain::reminder::{Reminder, StatusGuard};
use crate::ports::{PutOutcome, ReminderStore};

#[derive(Default)]
pub struct InMemoryReminderStore {
    rows: Mutex<HashMap<ReminderId, Reminder>>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rows never carry undrained events.
fn to_row(reminder: &Reminder) -> Reminder {
    let mut row = reminder.clone();
    row.take_events();
    row
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, reminder: &Reminder) -> Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&reminder.id()) {
            return Err(DocketError::Store(format!(
                "reminder {} already exists",
                reminder.id()
            )));
        }
        rows.insert(reminder.id(), to_row(reminder));
        Ok(())
    }

    async fn put(&self, reminder: &Reminder, expected: StatusGuard) -> Result<PutOutcome> {
        let mut rows = self.rows.lock().await;
        let Some(current) = rows.get_mut(&reminder.id()) else {
            return Err(DocketError::not_found("reminder", reminder.id()));
        };
        if current.status_guard() != expected {
            tracing::debug!(
                reminder_id = %reminder.id(),
                stored_status = %current.status(),
                stored_revision = current.revision(),
                expected_status = %expected.status,
                expected_revision = expected.revision,
                "conditional reminder write rejected"
            );
            return Ok(PutOutcome::Conflict);
        }
        *current = to_row(reminder);
        Ok(PutOutcome::Applied)
    }

    async fn find_due_before(&self, as_of: DateTime<Utc>, limit: usize) -> Result<Vec<Reminder>> {
        let rows = self.rows.lock().await;
        let mut due: Vec<Reminder> = rows.values().filter(|r| r.is_due(as_of)).cloned().collect();
        due.sort_by_key(|r| (r.trigger_at(), r.id()));
        due.truncate(limit);
        Ok(due)
    }

    async fn find_by_work_item(&self, work_item_id: WorkItemId) -> Result<Vec<Reminder>> {
        let rows = self.rows.lock().await;
        let mut found: Vec<Reminder> = rows
            .values()
            .filter(|r| r.work_item_id() == work_item_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.trigger_at(), r.id()));
        Ok(found)
    }
}
