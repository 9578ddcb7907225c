//! Domain events.
//!
//! Aggregates append events to a pending buffer while they mutate. The
//! application layer drains that buffer and hands it to an `EventSink` only
//! after the store accepted the write, so an event is never observed for a
//! change that did not commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::ids::{ReminderId, TenantId, WorkItemId};
use super::state::WorkItemState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    WorkItemCreated {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        title: String,
        by: Actor,
        at: DateTime<Utc>,
    },
    WorkItemStateChanged {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        from: WorkItemState,
        to: WorkItemState,
        by: Actor,
        at: DateTime<Utc>,
    },
    WorkItemUpdated {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        change: String,
        by: Actor,
        at: DateTime<Utc>,
    },
    WorkItemDeleted {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        by: Actor,
        at: DateTime<Utc>,
    },
    ReminderScheduled {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        reminder_id: ReminderId,
        trigger_at: DateTime<Utc>,
        by: Actor,
        at: DateTime<Utc>,
    },
    ReminderRescheduled {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        reminder_id: ReminderId,
        trigger_at: DateTime<Utc>,
        by: Actor,
        at: DateTime<Utc>,
    },
    ReminderTriggered {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        reminder_id: ReminderId,
        by: Actor,
        at: DateTime<Utc>,
    },
    ReminderFailed {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        reminder_id: ReminderId,
        error: String,
        by: Actor,
        at: DateTime<Utc>,
    },
    ReminderCancelled {
        tenant_id: TenantId,
        work_item_id: WorkItemId,
        reminder_id: ReminderId,
        by: Actor,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::WorkItemCreated { .. } => "work_item_created",
            DomainEvent::WorkItemStateChanged { .. } => "work_item_state_changed",
            DomainEvent::WorkItemUpdated { .. } => "work_item_updated",
            DomainEvent::WorkItemDeleted { .. } => "work_item_deleted",
            DomainEvent::ReminderScheduled { .. } => "reminder_scheduled",
            DomainEvent::ReminderRescheduled { .. } => "reminder_rescheduled",
            DomainEvent::ReminderTriggered { .. } => "reminder_triggered",
            DomainEvent::ReminderFailed { .. } => "reminder_failed",
            DomainEvent::ReminderCancelled { .. } => "reminder_cancelled",
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        match self {
            DomainEvent::WorkItemCreated { tenant_id, .. }
            | DomainEvent::WorkItemStateChanged { tenant_id, .. }
            | DomainEvent::WorkItemUpdated { tenant_id, .. }
            | DomainEvent::WorkItemDeleted { tenant_id, .. }
            | DomainEvent::ReminderScheduled { tenant_id, .. }
            | DomainEvent::ReminderRescheduled { tenant_id, .. }
            | DomainEvent::ReminderTriggered { tenant_id, .. }
            | DomainEvent::ReminderFailed { tenant_id, .. }
            | DomainEvent::ReminderCancelled { tenant_id, .. } => *tenant_id,
        }
    }
}
