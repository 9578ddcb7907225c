//! ReminderStore port - source of truth for reminder state.
//!
//! The store decides races. `put` is a conditional write: it applies only if
//! the stored row still matches the [`StatusGuard`] the caller captured
//! before mutating. A mismatch is reported as `PutOutcome::Conflict`, not as
//! an error, so callers can choose between "skip" (sweep) and "fail" (manual
//! command).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{ReminderId, WorkItemId};
use crate::domain::reminder::{Reminder, StatusGuard};

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Applied,
    /// The stored row no longer matched the guard; nothing was written.
    Conflict,
}

impl PutOutcome {
    /// `Conflict` becomes `DocketError::Concurrency` for callers that surface races.
    pub fn into_result(self, entity: &'static str, id: impl ToString) -> Result<()> {
        match self {
            PutOutcome::Applied => Ok(()),
            PutOutcome::Conflict => Err(DocketError::Concurrency {
                entity,
                id: id.to_string(),
            }),
        }
    }
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>>;

    /// Store a new reminder. Fails if the id already exists.
    async fn insert(&self, reminder: &Reminder) -> Result<()>;

    /// Replace the stored reminder iff it still matches `expected`
    /// (`UPDATE .. WHERE id = ? AND status = ? AND revision = ?`).
    async fn put(&self, reminder: &Reminder, expected: StatusGuard) -> Result<PutOutcome>;

    /// `Scheduled` reminders with `trigger_at <= as_of`, earliest first, at most `limit`.
    async fn find_due_before(&self, as_of: DateTime<Utc>, limit: usize) -> Result<Vec<Reminder>>;

    async fn find_by_work_item(&self, work_item_id: WorkItemId) -> Result<Vec<Reminder>>;
}
