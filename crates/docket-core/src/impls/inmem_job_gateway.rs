//! InMemoryJobGateway - a job table standing in for an external scheduler.
//!
//! It never fires anything by itself. Tests and the demo inspect the table,
//! and `set_unavailable(true)` makes every call fail with `Gateway`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::ReminderId;
use crate::ports::{JobDispatchGateway, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobSchedule {
    Once { at: DateTime<Utc> },
    Recurring { every_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledJob {
    pub id: JobId,
    pub schedule: JobSchedule,
    /// Number of `trigger_now` calls.
    pub manual_triggers: u32,
}

#[derive(Default)]
pub struct InMemoryJobGateway {
    jobs: Mutex<BTreeMap<JobId, ScheduledJob>>,
    unavailable: AtomicBool,
}

impl InMemoryJobGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn job(&self, id: &JobId) -> Option<ScheduledJob> {
        self.jobs.lock().await.get(id).cloned()
    }

    pub async fn jobs(&self) -> Vec<ScheduledJob> {
        self.jobs.lock().await.values().cloned().collect()
    }

    /// One-shot jobs whose time has come, earliest first.
    pub async fn due_jobs(&self, now: DateTime<Utc>) -> Vec<JobId> {
        let jobs = self.jobs.lock().await;
        let mut due: Vec<(DateTime<Utc>, JobId)> = jobs
            .values()
            .filter_map(|j| match j.schedule {
                JobSchedule::Once { at } if at <= now => Some((at, j.id.clone())),
                _ => None,
            })
            .collect();
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DocketError::Gateway("job scheduler unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobDispatchGateway for InMemoryJobGateway {
    async fn schedule_at(&self, reminder_id: ReminderId, at: DateTime<Utc>) -> Result<JobId> {
        self.check_available()?;
        let id = JobId::for_reminder(reminder_id);
        self.jobs.lock().await.insert(
            id.clone(),
            ScheduledJob {
                id: id.clone(),
                schedule: JobSchedule::Once { at },
                manual_triggers: 0,
            },
        );
        tracing::debug!(job_id = %id, %at, "job scheduled");
        Ok(id)
    }

    async fn schedule_recurring(&self, interval_secs: u64) -> Result<JobId> {
        self.check_available()?;
        if interval_secs == 0 {
            return Err(DocketError::validation("recurring interval must be positive"));
        }
        let id = JobId::sweep();
        self.jobs.lock().await.insert(
            id.clone(),
            ScheduledJob {
                id: id.clone(),
                schedule: JobSchedule::Recurring {
                    every_secs: interval_secs,
                },
                manual_triggers: 0,
            },
        );
        tracing::debug!(job_id = %id, interval_secs, "recurring job registered");
        Ok(id)
    }

    async fn delete(&self, job_id: &JobId) -> Result<bool> {
        self.check_available()?;
        Ok(self.jobs.lock().await.remove(job_id).is_some())
    }

    async fn reschedule(&self, job_id: &JobId, at: DateTime<Utc>) -> Result<bool> {
        self.check_available()?;
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(job_id) {
            Some(job) => {
                job.schedule = JobSchedule::Once { at };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn trigger_now(&self, job_id: &JobId) -> Result<bool> {
        self.check_available()?;
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(job_id) {
            Some(job) => {
                job.manual_triggers += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
