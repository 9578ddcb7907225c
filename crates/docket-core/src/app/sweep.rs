//! Due-reminder sweep.
//!
//! One run: query due reminders, then fire each one independently through
//! the same path as a manual trigger. Nothing is carried between runs.
//!
//! Per-reminder outcomes:
//! - notification sent, transition committed: `succeeded`
//! - recorded as `Failed` (delivery error), or a store/lookup error: `failed`
//! - someone else got there first (`InvalidState` / `Concurrency`): `skipped`
//!
//! No outcome stops the batch. A shutdown signal is checked between
//! reminders; transitions already committed stay committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::reminders::{Fired, ReminderService};
use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::ReminderId;
use crate::domain::Actor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ReminderService {
    /// Fire every reminder due at `as_of`, at most `batch_limit` of them.
    ///
    /// Fails only if the due query itself fails.
    pub async fn process_due_sweep(
        &self,
        as_of: DateTime<Utc>,
        batch_limit: usize,
    ) -> Result<SweepReport> {
        self.sweep(as_of, batch_limit, None).await
    }

    /// Like [`Self::process_due_sweep`], stopping early once `shutdown` reads `true`.
    pub async fn process_due_sweep_until(
        &self,
        as_of: DateTime<Utc>,
        batch_limit: usize,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SweepReport> {
        self.sweep(as_of, batch_limit, Some(shutdown)).await
    }

    async fn sweep(
        &self,
        as_of: DateTime<Utc>,
        batch_limit: usize,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<SweepReport> {
        let due = self.list_due_reminders(as_of, batch_limit).await?;
        tracing::debug!(as_of = %as_of, due = due.len(), batch_limit, "sweep started");

        let actor = Actor::system();
        let mut report = SweepReport::default();
        for candidate in due {
            if shutdown.is_some_and(|rx| *rx.borrow()) {
                tracing::info!(processed = report.attempted, "sweep interrupted by shutdown");
                break;
            }

            let id = candidate.id();
            report.attempted += 1;
            match self.sweep_one(id, as_of, &actor).await {
                Ok(Fired::Triggered) => {
                    report.succeeded += 1;
                    tracing::info!(reminder_id = %id, tenant_id = %candidate.tenant_id(), "reminder triggered");
                }
                Ok(Fired::Failed { cause }) => {
                    report.failed += 1;
                    tracing::warn!(
                        reminder_id = %id,
                        tenant_id = %candidate.tenant_id(),
                        error = ?cause,
                        "reminder recorded as failed"
                    );
                }
                Err(e) if e.is_benign_race() => {
                    report.skipped += 1;
                    tracing::debug!(reminder_id = %id, reason = %e, "reminder skipped");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(reminder_id = %id, error = %e, "reminder could not be processed");
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "sweep finished"
        );
        Ok(report)
    }

    async fn sweep_one(&self, id: ReminderId, as_of: DateTime<Utc>, actor: &Actor) -> Result<Fired> {
        let fresh = self
            .ctx
            .reminders
            .get(id)
            .await?
            .ok_or_else(|| DocketError::not_found("reminder", id))?;
        if !fresh.is_due(as_of) {
            return Err(DocketError::invalid_state(format!(
                "reminder {id} is no longer due ({}, {})",
                fresh.status(),
                fresh.trigger_at()
            )));
        }
        self.fire(fresh, None, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Harness;
    use crate::domain::reminder::FIRE_LEASE_SECS;
    use crate::domain::ReminderStatus;
    use crate::ports::{JobDispatchGateway, JobId, PutOutcome, ReminderStore};
    use chrono::Duration;

    #[tokio::test]
    async fn fires_only_due_reminders() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let a = h.schedule(wi, Duration::minutes(10), "a").await;
        let b = h.schedule(wi, Duration::minutes(19), "b").await;
        let c = h.schedule(wi, Duration::minutes(30), "c").await;

        // now - 10m, now - 1m, now + 10m
        h.clock.advance(Duration::minutes(20));
        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                attempted: 2,
                succeeded: 2,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(h.reminder(a).await.status(), ReminderStatus::Triggered);
        assert_eq!(h.reminder(b).await.status(), ReminderStatus::Triggered);
        assert_eq!(h.reminder(c).await.status(), ReminderStatus::Scheduled);
        assert!(h.gateway.job(&JobId::for_reminder(a)).await.is_none());
        assert!(h.gateway.job(&JobId::for_reminder(c)).await.is_some());
    }

    #[tokio::test]
    async fn one_failed_delivery_does_not_stop_the_batch() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let first = h.schedule(wi, Duration::minutes(10), "first").await;
        let second = h.schedule(wi, Duration::minutes(11), "second").await;
        h.notifier.fail_on("first").await;

        h.clock.advance(Duration::minutes(15));
        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);

        let failed = h.reminder(first).await;
        assert_eq!(failed.status(), ReminderStatus::Failed);
        assert!(failed.error_message().unwrap().contains("rejected"));
        assert_eq!(h.reminder(second).await.status(), ReminderStatus::Triggered);
        assert_eq!(
            h.events.names().await.iter().filter(|n| **n == "reminder_failed").count(),
            1
        );
    }

    #[tokio::test]
    async fn batch_limit_caps_the_run() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        for i in 0..5 {
            h.schedule(wi, Duration::minutes(10 + i), "tick").await;
        }
        h.clock.advance(Duration::hours(1));

        let first = h.reminders.process_due_sweep(h.now(), 3).await.unwrap();
        let second = h.reminders.process_due_sweep(h.now(), 3).await.unwrap();
        let third = h.reminders.process_due_sweep(h.now(), 3).await.unwrap();

        assert_eq!(first.succeeded, 3);
        assert_eq!(second.succeeded, 2);
        assert_eq!(third, SweepReport::default());
    }

    #[tokio::test]
    async fn already_handled_reminder_is_skipped() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "x").await;
        h.clock.advance(Duration::minutes(20));

        // Snapshot taken by the sweep's query, then a manual trigger wins.
        let stale = h.reminders.list_due_reminders(h.now(), 10).await.unwrap();
        assert_eq!(stale.len(), 1);
        h.reminders.trigger_reminder(h.tenant, id, None, &h.bob).await.unwrap();

        let outcome = h.reminders.sweep_one(id, h.now(), &Actor::system()).await;
        assert!(outcome.unwrap_err().is_benign_race());
        assert_eq!(h.notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn claimed_reminder_waits_for_its_lease() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "x").await;
        h.clock.advance(Duration::minutes(20));

        // A caller claimed it and went away before sending.
        let mut claimed = h.reminder(id).await;
        let guard = claimed.status_guard();
        claimed.claim(h.now()).unwrap();
        assert_eq!(
            h.reminder_store.put(&claimed, guard).await.unwrap(),
            PutOutcome::Applied
        );

        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();
        assert_eq!(report, SweepReport::default());
        assert!(h.notifier.sent().await.is_empty());

        h.clock.advance(Duration::seconds(FIRE_LEASE_SECS));
        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(h.notifier.sent().await.len(), 1);
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Triggered);
    }

    #[tokio::test]
    async fn gateway_outage_does_not_block_the_sweep() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "x").await;
        h.clock.advance(Duration::minutes(20));
        h.gateway.set_unavailable(true);

        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Triggered);

        h.gateway.set_unavailable(false);
        let job = JobId::for_reminder(id);
        assert!(h.gateway.job(&job).await.is_some());
        assert!(h.gateway.delete(&job).await.unwrap());
    }

    #[tokio::test]
    async fn missing_work_item_counts_as_failed() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "x").await;
        h.forget_work_item(wi).await;
        h.clock.advance(Duration::minutes(20));

        let report = h.reminders.process_due_sweep(h.now(), 10).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Scheduled);
    }

    #[tokio::test]
    async fn shutdown_stops_before_the_next_reminder() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        h.schedule(wi, Duration::minutes(10), "x").await;
        h.schedule(wi, Duration::minutes(11), "y").await;
        h.clock.advance(Duration::minutes(20));

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let report = h
            .reminders
            .process_due_sweep_until(h.now(), 10, &rx)
            .await
            .unwrap();

        assert_eq!(report, SweepReport::default());
        assert_eq!(h.reminders.list_due_reminders(h.now(), 10).await.unwrap().len(), 2);
    }
}
