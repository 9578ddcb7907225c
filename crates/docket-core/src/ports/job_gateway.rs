//! JobDispatchGateway port - boundary to an external scheduler.
//!
//! The gateway only mirrors domain state. A reminder's status in the
//! `ReminderStore` is authoritative: if a job deletion is lost, the stale job
//! fires into a reminder that is no longer `Scheduled` and is rejected there.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::domain::errors::Result;
use crate::domain::ids::ReminderId;

/// External job identifier.
///
/// Reminder jobs are derived from the reminder id (`reminder_{ulid}`), so no
/// lookup table is needed to delete or move them. This is the only place the
/// format is spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn for_reminder(id: ReminderId) -> Self {
        Self(format!("reminder_{}", id.as_ulid()))
    }

    /// Id of the recurring due-reminder sweep job.
    pub fn sweep() -> Self {
        Self("reminder_sweep".to_string())
    }

    /// The reminder a job was created for. `None` for the sweep job and for
    /// ids this process did not mint.
    pub fn reminder_id(&self) -> Option<ReminderId> {
        let ulid = self.0.strip_prefix("reminder_")?;
        Ulid::from_string(ulid).ok().map(ReminderId::from_ulid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
pub trait JobDispatchGateway: Send + Sync {
    /// Enqueue a one-shot trigger for `reminder_id`. Scheduling an id that
    /// already has a job replaces it.
    async fn schedule_at(&self, reminder_id: ReminderId, at: DateTime<Utc>) -> Result<JobId>;

    async fn schedule_recurring(&self, interval_secs: u64) -> Result<JobId>;

    /// Returns false if no such job existed. Deleting twice is fine.
    async fn delete(&self, job_id: &JobId) -> Result<bool>;

    /// Returns false if no such job existed.
    async fn reschedule(&self, job_id: &JobId, at: DateTime<Utc>) -> Result<bool>;

    async fn trigger_now(&self, job_id: &JobId) -> Result<bool>;
}
