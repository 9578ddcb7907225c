//! ReminderService - reminder のコマンドとクエリ
//!
//! # フロー（全コマンド共通）
//! 1. tenant を確認してスナップショットを読む
//! 2. 同期的な domain 遷移（先に write guard を取る）
//! 3. store への条件付き書き込み
//! 4. job gateway へ反映（best effort）
//! 5. 溜まったイベントを publish
//!
//! sweep、`trigger_reminder`、`handle_job_fired` は `fire` を共有する。
//! 通知の前に claim を書くので、同じ reminder を取り合った呼び出しは
//! store の条件付き書き込みで決着し、勝者だけが通知する。

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::context::AppContext;
use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{ReminderId, TenantId, WorkItemId};
use crate::domain::reminder::Reminder;
use crate::domain::work_item::WorkItem;
use crate::domain::Actor;
use crate::ports::{JobId, PutOutcome};

pub struct ReminderService {
    pub(super) ctx: Arc<AppContext>,
}

/// How a fire attempt ended once its transition committed.
#[derive(Debug)]
pub(crate) enum Fired {
    Triggered,
    /// Stored as `Failed`. `cause` is set when notification delivery is what failed.
    Failed { cause: Option<DocketError> },
}

impl ReminderService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Create a reminder on a work item and enqueue its job.
    pub async fn schedule_reminder(
        &self,
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        trigger_at: DateTime<Utc>,
        message: &str,
        actor: &Actor,
    ) -> Result<ReminderId> {
        let ctx = &self.ctx;
        let now = ctx.clock.now();
        let mut item = ctx.work_item_in_tenant(tenant_id, work_item_id).await?;
        ctx.policy.check_schedule(&item, trigger_at, now)?;

        let id = ctx.ids.generate_reminder_id();
        let mut reminder = Reminder::new(
            id,
            tenant_id,
            work_item_id,
            trigger_at,
            message,
            actor,
            now,
            ctx.policy.lead_time(),
        )?;
        let expected = item.revision();
        item.add_reminder(&reminder, actor, now)?;

        // Item first: a concurrent archive must win over the new reminder.
        ctx.work_items
            .put(&item, expected)
            .await?
            .into_result("work item", item.id())?;
        if let Err(e) = ctx.reminders.insert(&reminder).await {
            self.unlink_reminder(item, id, actor).await;
            return Err(e);
        }

        match ctx.gateway.schedule_at(id, trigger_at).await {
            Ok(job_id) => tracing::debug!(reminder_id = %id, job_id = %job_id, "reminder job enqueued"),
            Err(e) => gateway_failed("schedule_at", id, &e),
        }

        let mut events = item.take_events();
        events.extend(reminder.take_events());
        ctx.publish(events).await;

        tracing::info!(
            tenant_id = %tenant_id,
            work_item_id = %work_item_id,
            reminder_id = %id,
            trigger_at = %trigger_at,
            actor = %actor,
            "reminder scheduled"
        );
        Ok(id)
    }

    /// Move a `Scheduled` reminder. With `message`, the message is replaced too.
    pub async fn reschedule_reminder(
        &self,
        tenant_id: TenantId,
        reminder_id: ReminderId,
        new_time: DateTime<Utc>,
        message: Option<&str>,
        actor: &Actor,
    ) -> Result<()> {
        let ctx = &self.ctx;
        let now = ctx.clock.now();
        let mut reminder = ctx.reminder_in_tenant(tenant_id, reminder_id).await?;
        let item = ctx.work_item_in_tenant(tenant_id, reminder.work_item_id()).await?;

        let guard = reminder.status_guard();
        let lead_time = ctx.policy.lead_time();
        match message {
            Some(message) => reminder.update(new_time, message, actor, now, lead_time)?,
            None => reminder.reschedule(new_time, actor, now, lead_time)?,
        }
        ctx.policy.check_schedule(&item, new_time, now)?;

        ctx.reminders
            .put(&reminder, guard)
            .await?
            .into_result("reminder", reminder_id)?;

        let job_id = JobId::for_reminder(reminder_id);
        match ctx.gateway.reschedule(&job_id, new_time).await {
            Ok(true) => {}
            Ok(false) => {
                // The job was lost or never created; put it back.
                if let Err(e) = ctx.gateway.schedule_at(reminder_id, new_time).await {
                    gateway_failed("schedule_at", reminder_id, &e);
                }
            }
            Err(e) => gateway_failed("reschedule", reminder_id, &e),
        }

        ctx.publish(reminder.take_events()).await;
        tracing::info!(
            tenant_id = %tenant_id,
            reminder_id = %reminder_id,
            trigger_at = %new_time,
            actor = %actor,
            "reminder rescheduled"
        );
        Ok(())
    }

    /// Fire a reminder now.
    ///
    /// Without `error_message` the notification is sent and the reminder ends
    /// `Triggered`; if delivery fails the reminder ends `Failed` and the
    /// delivery error is returned. With `error_message` no notification is sent
    /// and the reminder is recorded as `Failed` with that message.
    ///
    /// Losing a race against the sweep or another trigger returns
    /// `InvalidState` or `Concurrency`.
    pub async fn trigger_reminder(
        &self,
        tenant_id: TenantId,
        reminder_id: ReminderId,
        error_message: Option<&str>,
        actor: &Actor,
    ) -> Result<()> {
        let reminder = self.ctx.reminder_in_tenant(tenant_id, reminder_id).await?;
        match self
            .fire(reminder, error_message.map(str::to_owned), actor)
            .await?
        {
            Fired::Triggered | Fired::Failed { cause: None } => Ok(()),
            Fired::Failed { cause: Some(e) } => Err(e),
        }
    }

    pub async fn cancel_reminder(
        &self,
        tenant_id: TenantId,
        reminder_id: ReminderId,
        actor: &Actor,
    ) -> Result<()> {
        let ctx = &self.ctx;
        let mut reminder = ctx.reminder_in_tenant(tenant_id, reminder_id).await?;
        let guard = reminder.status_guard();
        reminder.cancel(actor, ctx.clock.now())?;
        ctx.reminders
            .put(&reminder, guard)
            .await?
            .into_result("reminder", reminder_id)?;

        self.delete_job(reminder_id).await;
        ctx.publish(reminder.take_events()).await;
        tracing::info!(tenant_id = %tenant_id, reminder_id = %reminder_id, actor = %actor, "reminder cancelled");
        Ok(())
    }

    /// A job fired by the gateway's own timer.
    ///
    /// Returns `Ok(true)` if this call recorded the reminder as `Triggered` or
    /// `Failed`, and `Ok(false)` if the job was stale because the reminder had
    /// already left `Scheduled` or another caller was firing it.
    pub async fn handle_job_fired(&self, job_id: &JobId) -> Result<bool> {
        let reminder_id = job_id
            .reminder_id()
            .ok_or_else(|| DocketError::validation(format!("job {job_id} is not a reminder job")))?;
        let reminder = self
            .ctx
            .reminders
            .get(reminder_id)
            .await?
            .ok_or_else(|| DocketError::not_found("reminder", reminder_id))?;

        match self.fire(reminder, None, &Actor::system()).await {
            Ok(Fired::Triggered) => Ok(true),
            Ok(Fired::Failed { cause }) => {
                tracing::warn!(job_id = %job_id, error = ?cause, "reminder recorded as failed");
                Ok(true)
            }
            Err(e) if e.is_benign_race() => {
                tracing::debug!(job_id = %job_id, reason = %e, "stale job ignored");
                self.delete_job(reminder_id).await;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Due reminders across all tenants, earliest first. Used by the sweep.
    pub async fn list_due_reminders(
        &self,
        as_of: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Reminder>> {
        self.ctx.reminders.find_due_before(as_of, limit).await
    }

    pub async fn reminders_for_work_item(
        &self,
        tenant_id: TenantId,
        work_item_id: WorkItemId,
    ) -> Result<Vec<Reminder>> {
        self.ctx.work_item_in_tenant(tenant_id, work_item_id).await?;
        self.ctx.reminders.find_by_work_item(work_item_id).await
    }

    pub async fn get_reminder(&self, tenant_id: TenantId, reminder_id: ReminderId) -> Result<Reminder> {
        self.ctx.reminder_in_tenant(tenant_id, reminder_id).await
    }

    /// 手動 trigger・gateway job・sweep 共通の発火経路
    ///
    /// `reminder` は読み直したばかりのものを渡すこと。
    ///
    /// # フロー
    /// 1. ここで見た status + revision を guard に claim を書く
    ///    （負けた側は通知前に `Concurrency` / `InvalidState` で止まる）
    /// 2. 通知を送る（`preset_error` があれば送らない）
    /// 3. claim 後の guard で `Triggered` / `Failed` を書く
    pub(crate) async fn fire(
        &self,
        mut reminder: Reminder,
        preset_error: Option<String>,
        actor: &Actor,
    ) -> Result<Fired> {
        let ctx = &self.ctx;
        if !reminder.is_pending() {
            return Err(DocketError::invalid_state(format!(
                "reminder {} is already {}",
                reminder.id(),
                reminder.status()
            )));
        }
        let item = ctx
            .work_item_in_tenant(reminder.tenant_id(), reminder.work_item_id())
            .await?;

        let unclaimed = reminder.status_guard();
        reminder.claim(ctx.clock.now())?;
        ctx.reminders
            .put(&reminder, unclaimed)
            .await?
            .into_result("reminder", reminder.id())?;
        let guard = reminder.status_guard();

        let fired = match preset_error {
            Some(error) => {
                reminder.mark_as_failed(error, actor, ctx.clock.now())?;
                Fired::Failed { cause: None }
            }
            None => {
                let sent = ctx
                    .notifier
                    .send_reminder_notification(
                        &reminder.audit().created_by,
                        item.title(),
                        reminder.message(),
                        item.due_date(),
                    )
                    .await;
                let now = ctx.clock.now();
                match sent {
                    Ok(()) => {
                        reminder.mark_as_triggered(actor, now)?;
                        Fired::Triggered
                    }
                    Err(e) => {
                        reminder.mark_as_failed(e.to_string(), actor, now)?;
                        Fired::Failed { cause: Some(e) }
                    }
                }
            }
        };

        ctx.reminders
            .put(&reminder, guard)
            .await?
            .into_result("reminder", reminder.id())?;

        self.delete_job(reminder.id()).await;
        ctx.publish(reminder.take_events()).await;
        Ok(fired)
    }

    /// Undo the item half of `schedule_reminder` after the reminder insert failed.
    async fn unlink_reminder(&self, mut item: WorkItem, reminder_id: ReminderId, actor: &Actor) {
        let expected = item.revision();
        item.take_events();
        if !item.detach_reminder(reminder_id, actor, self.ctx.clock.now()) {
            return;
        }
        let restored = self.ctx.work_items.put(&item, expected).await;
        if !matches!(restored, Ok(PutOutcome::Applied)) {
            tracing::error!(
                work_item_id = %item.id(),
                reminder_id = %reminder_id,
                outcome = ?restored,
                "could not unlink reminder that was never stored"
            );
        }
    }

    async fn delete_job(&self, reminder_id: ReminderId) {
        let job_id = JobId::for_reminder(reminder_id);
        if let Err(e) = self.ctx.gateway.delete(&job_id).await {
            gateway_failed("delete", reminder_id, &e);
        }
    }
}

fn gateway_failed(op: &'static str, reminder_id: ReminderId, err: &DocketError) {
    tracing::warn!(
        op,
        reminder_id = %reminder_id,
        error = %err,
        "job gateway call failed; domain state is unaffected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Harness;
    use crate::domain::reminder::StatusGuard;
    use crate::domain::{ReminderStatus, WorkItemState};
    use crate::impls::{InMemoryReminderStore, JobSchedule};
    use crate::ports::{JobDispatchGateway, ReminderStore};
    use async_trait::async_trait;
    use chrono::Duration;

    /// Reminder store whose inserts always fail.
    struct RejectingInserts(Arc<InMemoryReminderStore>);

    #[async_trait]
    impl ReminderStore for RejectingInserts {
        async fn get(&self, id: ReminderId) -> Result<Option<Reminder>> {
            self.0.get(id).await
        }

        async fn insert(&self, _reminder: &Reminder) -> Result<()> {
            Err(DocketError::Store("disk full".to_string()))
        }

        async fn put(&self, reminder: &Reminder, expected: StatusGuard) -> Result<PutOutcome> {
            self.0.put(reminder, expected).await
        }

        async fn find_due_before(&self, as_of: DateTime<Utc>, limit: usize) -> Result<Vec<Reminder>> {
            self.0.find_due_before(as_of, limit).await
        }

        async fn find_by_work_item(&self, work_item_id: WorkItemId) -> Result<Vec<Reminder>> {
            self.0.find_by_work_item(work_item_id).await
        }
    }

    #[tokio::test]
    async fn schedule_stores_reminder_links_item_and_enqueues_job() {
        let h = Harness::new();
        let wi = h.work_item("Quarterly report").await;
        let at = h.now() + Duration::hours(1);

        let id = h
            .reminders
            .schedule_reminder(h.tenant, wi, at, "send the report", &h.alice)
            .await
            .unwrap();

        let stored = h.reminder(id).await;
        assert_eq!(stored.status(), ReminderStatus::Scheduled);
        assert_eq!(stored.trigger_at(), at);
        assert_eq!(h.item(wi).await.reminder_ids(), &[id]);

        let job = h.gateway.job(&JobId::for_reminder(id)).await.unwrap();
        assert_eq!(job.schedule, JobSchedule::Once { at });
        assert!(h.events.names().await.contains(&"reminder_scheduled"));
    }

    #[tokio::test]
    async fn schedule_rejects_too_soon_and_foreign_tenant() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;

        let err = h
            .reminders
            .schedule_reminder(h.tenant, wi, h.now() + Duration::minutes(4), "x", &h.alice)
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::Validation(_)));

        let err = h
            .reminders
            .schedule_reminder(TenantId::generate(), wi, h.now() + Duration::hours(1), "x", &h.alice)
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::NotFound { .. }));
        assert!(h.gateway.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn schedule_on_archived_item_is_invalid_state() {
        let h = Harness::new();
        let wi = h.work_item("Old").await;
        h.work_items.archive(h.tenant, wi, &h.alice).await.unwrap();

        let err = h
            .reminders
            .schedule_reminder(h.tenant, wi, h.now() + Duration::hours(1), "x", &h.alice)
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::InvalidState(_)));
    }

    #[tokio::test]
    async fn gateway_outage_does_not_block_scheduling() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        h.gateway.set_unavailable(true);

        let id = h
            .reminders
            .schedule_reminder(h.tenant, wi, h.now() + Duration::hours(1), "x", &h.alice)
            .await
            .unwrap();
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Scheduled);
    }

    #[tokio::test]
    async fn failed_insert_leaves_the_work_item_untouched() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let revision = h.item(wi).await.revision();
        let ctx = Arc::new(AppContext {
            reminders: Arc::new(RejectingInserts(h.reminder_store.clone())),
            work_items: h.ctx.work_items.clone(),
            notifier: h.ctx.notifier.clone(),
            gateway: h.ctx.gateway.clone(),
            events: h.ctx.events.clone(),
            clock: h.ctx.clock.clone(),
            ids: h.ctx.ids.clone(),
            policy: h.ctx.policy.clone(),
        });

        let err = ReminderService::new(ctx)
            .schedule_reminder(h.tenant, wi, h.now() + Duration::hours(1), "x", &h.alice)
            .await
            .unwrap_err();

        assert!(matches!(err, DocketError::Store(_)));
        let item = h.item(wi).await;
        assert!(item.reminder_ids().is_empty());
        assert!(item.revision() > revision);
        assert!(!h.events.names().await.contains(&"reminder_scheduled"));
        assert!(h.gateway.jobs().await.is_empty());

        // The item is still usable afterwards.
        h.schedule(wi, Duration::hours(1), "retry").await;
        assert_eq!(h.item(wi).await.reminder_ids().len(), 1);
    }

    #[tokio::test]
    async fn reschedule_honours_lead_time() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;

        let err = h
            .reminders
            .reschedule_reminder(h.tenant, id, h.now() + Duration::minutes(4), None, &h.alice)
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::Validation(_)));

        let later = h.now() + Duration::minutes(6);
        h.reminders
            .reschedule_reminder(h.tenant, id, later, Some("new text"), &h.alice)
            .await
            .unwrap();

        let stored = h.reminder(id).await;
        assert_eq!(stored.trigger_at(), later);
        assert_eq!(stored.message(), "new text");
        assert_eq!(
            h.gateway.job(&JobId::for_reminder(id)).await.unwrap().schedule,
            JobSchedule::Once { at: later }
        );
    }

    #[tokio::test]
    async fn reschedule_recreates_a_missing_job() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;
        h.gateway.delete(&JobId::for_reminder(id)).await.unwrap();

        let at = h.now() + Duration::hours(2);
        h.reminders
            .reschedule_reminder(h.tenant, id, at, None, &h.alice)
            .await
            .unwrap();
        assert!(h.gateway.job(&JobId::for_reminder(id)).await.is_some());
    }

    #[tokio::test]
    async fn gateway_outage_does_not_block_reschedule_or_cancel() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let moved = h.schedule(wi, Duration::hours(1), "moved").await;
        let dropped = h.schedule(wi, Duration::hours(1), "dropped").await;
        h.gateway.set_unavailable(true);

        let later = h.now() + Duration::hours(4);
        h.reminders
            .reschedule_reminder(h.tenant, moved, later, None, &h.alice)
            .await
            .unwrap();
        h.reminders.cancel_reminder(h.tenant, dropped, &h.alice).await.unwrap();

        assert_eq!(h.reminder(moved).await.trigger_at(), later);
        assert_eq!(h.reminder(dropped).await.status(), ReminderStatus::Cancelled);

        // The jobs are out of date until the gateway comes back.
        h.gateway.set_unavailable(false);
        assert_ne!(
            h.gateway.job(&JobId::for_reminder(moved)).await.unwrap().schedule,
            JobSchedule::Once { at: later }
        );
        assert!(h.gateway.job(&JobId::for_reminder(dropped)).await.is_some());
    }

    #[tokio::test]
    async fn gateway_timer_fires_a_scheduled_reminder() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "ping").await;
        h.clock.advance(Duration::minutes(10));

        let due = h.gateway.due_jobs(h.now()).await;
        assert_eq!(due, vec![JobId::for_reminder(id)]);
        assert!(h.reminders.handle_job_fired(&due[0]).await.unwrap());

        let stored = h.reminder(id).await;
        assert_eq!(stored.status(), ReminderStatus::Triggered);
        assert_eq!(stored.audit().updated_by, Actor::system());
        assert_eq!(h.notifier.sent().await.len(), 1);
        assert!(h.gateway.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn stale_gateway_job_after_manual_trigger_is_ignored() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::minutes(10), "ping").await;

        // The job delete is lost, so the job outlives the reminder's firing.
        h.gateway.set_unavailable(true);
        h.reminders.trigger_reminder(h.tenant, id, None, &h.bob).await.unwrap();
        h.gateway.set_unavailable(false);
        assert!(h.gateway.job(&JobId::for_reminder(id)).await.is_some());

        h.clock.advance(Duration::minutes(15));
        for job in h.gateway.due_jobs(h.now()).await {
            assert!(!h.reminders.handle_job_fired(&job).await.unwrap());
        }

        assert_eq!(h.notifier.sent().await.len(), 1);
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Triggered);
        assert!(h.gateway.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn non_reminder_job_is_rejected() {
        let h = Harness::new();
        let err = h.reminders.handle_job_fired(&JobId::sweep()).await.unwrap_err();
        assert!(matches!(err, DocketError::Validation(_)));
    }

    #[tokio::test]
    async fn manual_trigger_notifies_creator_and_removes_job() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;

        h.reminders
            .trigger_reminder(h.tenant, id, None, &h.bob)
            .await
            .unwrap();

        let stored = h.reminder(id).await;
        assert_eq!(stored.status(), ReminderStatus::Triggered);
        assert_eq!(stored.triggered_at(), Some(h.now()));
        let sent = h.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, h.alice);
        assert_eq!(sent[0].work_item_title, "Report");
        assert!(h.gateway.job(&JobId::for_reminder(id)).await.is_none());

        let again = h
            .reminders
            .trigger_reminder(h.tenant, id, None, &h.bob)
            .await
            .unwrap_err();
        assert!(matches!(again, DocketError::InvalidState(_)));
        assert_eq!(h.notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn manual_trigger_with_error_records_failure_without_sending() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;

        h.reminders
            .trigger_reminder(h.tenant, id, Some("mailbox full"), &h.bob)
            .await
            .unwrap();

        let stored = h.reminder(id).await;
        assert_eq!(stored.status(), ReminderStatus::Failed);
        assert_eq!(stored.error_message(), Some("mailbox full"));
        assert!(h.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn manual_trigger_surfaces_delivery_failure_after_recording_it() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;
        h.notifier.fail_on("ping").await;

        let err = h
            .reminders
            .trigger_reminder(h.tenant, id, None, &h.bob)
            .await
            .unwrap_err();

        assert!(matches!(err, DocketError::Notification(_)));
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Failed);
    }

    #[tokio::test]
    async fn cancel_then_everything_else_is_rejected() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;

        h.reminders.cancel_reminder(h.tenant, id, &h.alice).await.unwrap();
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Cancelled);
        assert!(h.gateway.job(&JobId::for_reminder(id)).await.is_none());

        let reschedule = h
            .reminders
            .reschedule_reminder(h.tenant, id, h.now() + Duration::hours(3), None, &h.alice)
            .await
            .unwrap_err();
        assert!(reschedule.is_benign_race());
        let trigger = h.reminders.trigger_reminder(h.tenant, id, None, &h.alice).await.unwrap_err();
        assert!(trigger.is_benign_race());
    }

    #[tokio::test]
    async fn reminders_are_invisible_to_other_tenants() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, Duration::hours(1), "ping").await;
        let other = TenantId::generate();

        for err in [
            h.reminders.trigger_reminder(other, id, None, &h.alice).await.unwrap_err(),
            h.reminders.cancel_reminder(other, id, &h.alice).await.unwrap_err(),
            h.reminders.get_reminder(other, id).await.unwrap_err(),
            h.reminders.reminders_for_work_item(other, wi).await.unwrap_err(),
        ] {
            assert!(matches!(err, DocketError::NotFound { .. }), "{err:?}");
        }
        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Scheduled);
    }

    #[tokio::test]
    async fn reminders_for_work_item_lists_in_trigger_order() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let late = h.schedule(wi, Duration::hours(3), "late").await;
        let early = h.schedule(wi, Duration::hours(1), "early").await;

        let listed: Vec<_> = h
            .reminders
            .reminders_for_work_item(h.tenant, wi)
            .await
            .unwrap()
            .iter()
            .map(Reminder::id)
            .collect();
        assert_eq!(listed, vec![early, late]);
        assert_eq!(h.item(wi).await.state(), WorkItemState::Draft);
    }
}
