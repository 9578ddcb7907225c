//! Reminder entity and its lifecycle.
//!
//! A reminder starts `Scheduled` and leaves that state exactly once, to
//! `Triggered`, `Failed` or `Cancelled`. Every mutator first checks that the
//! reminder is still `Scheduled`; together with the store's status-guarded
//! write this is what keeps a reminder from firing twice.
//!
//! Firing is two writes. `claim` takes a lease while the reminder stays
//! `Scheduled`, and only the caller whose claim was stored sends the
//! notification and records the outcome. A lease left behind by a crashed
//! caller expires after [`FIRE_LEASE_SECS`] and the reminder is due again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::audit::Audit;
use super::errors::{DocketError, Result};
use super::events::DomainEvent;
use super::ids::{ReminderId, TenantId, WorkItemId};
use super::state::ReminderStatus;

pub const MAX_MESSAGE_LEN: usize = 500;
pub const MAX_ERROR_LEN: usize = 1000;
pub const FIRE_LEASE_SECS: i64 = 300;

/// Expected stored state for a status-guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusGuard {
    pub status: ReminderStatus,
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    tenant_id: TenantId,
    work_item_id: WorkItemId,
    trigger_at: DateTime<Utc>,
    message: String,
    status: ReminderStatus,
    triggered_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    audit: Audit,
    revision: u64,
    #[serde(default)]
    claimed_until: Option<DateTime<Utc>>,

    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl Reminder {
    /// Create a `Scheduled` reminder.
    ///
    /// Fails with `Validation` if the message is empty or too long, or if
    /// `trigger_at` is not later than `now + lead_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ReminderId,
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        trigger_at: DateTime<Utc>,
        message: impl Into<String>,
        actor: &Actor,
        now: DateTime<Utc>,
        lead_time: Duration,
    ) -> Result<Self> {
        let message = validate_message(message.into())?;
        validate_trigger_time(trigger_at, now, lead_time)?;
        Ok(Self {
            id,
            tenant_id,
            work_item_id,
            trigger_at,
            message,
            status: ReminderStatus::Scheduled,
            triggered_at: None,
            error_message: None,
            audit: Audit::new(actor, now),
            revision: 0,
            claimed_until: None,
            pending_events: Vec::new(),
        })
    }

    pub fn id(&self) -> ReminderId {
        self.id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn work_item_id(&self) -> WorkItemId {
        self.work_item_id
    }

    pub fn trigger_at(&self) -> DateTime<Utc> {
        self.trigger_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ReminderStatus {
        self.status
    }

    pub fn triggered_at(&self) -> Option<DateTime<Utc>> {
        self.triggered_at
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn audit(&self) -> &Audit {
        &self.audit
    }

    /// Bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// What a conditional write must find in the store for this copy to win.
    /// Capture it before mutating.
    pub fn status_guard(&self) -> StatusGuard {
        StatusGuard {
            status: self.status,
            revision: self.revision,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Scheduled
    }

    /// Scheduled, past its trigger time and not held by another caller's lease.
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.is_pending() && self.trigger_at <= as_of && !self.is_claimed(as_of)
    }

    /// True while a fire lease taken by `claim` is still running.
    pub fn is_claimed(&self, now: DateTime<Utc>) -> bool {
        self.claimed_until.is_some_and(|until| until > now)
    }

    /// Take the fire lease. Status stays `Scheduled`; the revision moves, so
    /// storing the claim with the guard captured before it admits one caller.
    pub fn claim(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_unclaimed("claim", now)?;
        self.claimed_until = Some(now + Duration::seconds(FIRE_LEASE_SECS));
        self.revision += 1;
        Ok(())
    }

    /// Move the trigger time. Only valid while `Scheduled`.
    pub fn reschedule(
        &mut self,
        new_time: DateTime<Utc>,
        actor: &Actor,
        now: DateTime<Utc>,
        lead_time: Duration,
    ) -> Result<()> {
        self.ensure_unclaimed("reschedule", now)?;
        validate_trigger_time(new_time, now, lead_time)?;
        self.trigger_at = new_time;
        self.touch(actor, now);
        self.raise_rescheduled(actor, now);
        Ok(())
    }

    /// Replace both trigger time and message. Same guards as `reschedule`.
    pub fn update(
        &mut self,
        new_time: DateTime<Utc>,
        new_message: impl Into<String>,
        actor: &Actor,
        now: DateTime<Utc>,
        lead_time: Duration,
    ) -> Result<()> {
        self.ensure_unclaimed("update", now)?;
        let message = validate_message(new_message.into())?;
        validate_trigger_time(new_time, now, lead_time)?;
        self.trigger_at = new_time;
        self.message = message;
        self.touch(actor, now);
        self.raise_rescheduled(actor, now);
        Ok(())
    }

    pub fn mark_as_triggered(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.ensure_scheduled("trigger")?;
        self.status = ReminderStatus::Triggered;
        self.triggered_at = Some(now);
        self.claimed_until = None;
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::ReminderTriggered {
            tenant_id: self.tenant_id,
            work_item_id: self.work_item_id,
            reminder_id: self.id,
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    /// Record a failed firing. The message is cut to [`MAX_ERROR_LEN`] characters.
    pub fn mark_as_failed(
        &mut self,
        error: impl Into<String>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_scheduled("fail")?;
        let error = truncate_chars(error.into(), MAX_ERROR_LEN);
        self.status = ReminderStatus::Failed;
        self.error_message = Some(error.clone());
        self.claimed_until = None;
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::ReminderFailed {
            tenant_id: self.tenant_id,
            work_item_id: self.work_item_id,
            reminder_id: self.id,
            error,
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    pub fn cancel(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.ensure_unclaimed("cancel", now)?;
        self.status = ReminderStatus::Cancelled;
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::ReminderCancelled {
            tenant_id: self.tenant_id,
            work_item_id: self.work_item_id,
            reminder_id: self.id,
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    /// Drain events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn ensure_scheduled(&self, op: &str) -> Result<()> {
        if self.status == ReminderStatus::Scheduled {
            Ok(())
        } else {
            Err(DocketError::invalid_state(format!(
                "cannot {op} reminder {} in status {}",
                self.id, self.status
            )))
        }
    }

    fn ensure_unclaimed(&self, op: &str, now: DateTime<Utc>) -> Result<()> {
        self.ensure_scheduled(op)?;
        if self.is_claimed(now) {
            return Err(DocketError::invalid_state(format!(
                "cannot {op} reminder {}: it is being fired",
                self.id
            )));
        }
        Ok(())
    }

    fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.audit.touch(actor, now);
        self.revision += 1;
    }

    fn raise_rescheduled(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.pending_events.push(DomainEvent::ReminderRescheduled {
            tenant_id: self.tenant_id,
            work_item_id: self.work_item_id,
            reminder_id: self.id,
            trigger_at: self.trigger_at,
            by: actor.clone(),
            at: now,
        });
    }
}

/// `trigger_at` must be strictly later than `now + lead_time`.
pub fn validate_trigger_time(
    trigger_at: DateTime<Utc>,
    now: DateTime<Utc>,
    lead_time: Duration,
) -> Result<()> {
    if trigger_at <= now + lead_time {
        return Err(DocketError::validation(format!(
            "reminder time must be more than {} minute(s) in the future",
            lead_time.num_minutes()
        )));
    }
    Ok(())
}

fn validate_message(message: String) -> Result<String> {
    if message.trim().is_empty() {
        return Err(DocketError::validation("reminder message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(DocketError::validation(format!(
            "reminder message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(message)
}

fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    }
}
