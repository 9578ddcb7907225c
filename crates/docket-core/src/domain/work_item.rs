//! Work item aggregate.
//!
//! State changes go through [`WorkItemState::can_transition_to`]; there is no
//! other copy of the transition rules. An archived item rejects every
//! mutation with `InvalidState`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::audit::Audit;
use super::errors::{DocketError, Result};
use super::events::DomainEvent;
use super::ids::{ReminderId, TenantId, WorkItemId};
use super::reminder::Reminder;
use super::state::{Priority, WorkItemState};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 50;
pub const MAX_ESTIMATED_HOURS: f64 = 1000.0;

/// Input for creating a work item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorkItem {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: f64,
    pub tags: Vec<String>,
}

impl NewWorkItem {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    tenant_id: TenantId,
    title: String,
    description: Option<String>,
    priority: Priority,
    state: WorkItemState,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    estimated_hours: f64,
    actual_hours: f64,
    tags: Vec<String>,
    reminder_ids: Vec<ReminderId>,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    audit: Audit,
    revision: u64,

    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl WorkItem {
    /// Create a `Draft` item. Title uniqueness is the caller's job; it needs the store.
    pub fn new(
        id: WorkItemId,
        tenant_id: TenantId,
        input: NewWorkItem,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let title = validate_title(&input.title)?;
        if let Some(description) = &input.description
            && description.chars().count() > MAX_DESCRIPTION_LEN
        {
            return Err(DocketError::validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        validate_hours("estimated hours", input.estimated_hours)?;
        if input.estimated_hours > MAX_ESTIMATED_HOURS {
            return Err(DocketError::validation(format!(
                "estimated hours must be between 0 and {MAX_ESTIMATED_HOURS}"
            )));
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in input.tags {
            validate_tag(&tag)?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.len() > MAX_TAGS {
            return Err(DocketError::validation(format!(
                "a work item can carry at most {MAX_TAGS} tags"
            )));
        }

        let mut item = Self {
            id,
            tenant_id,
            title,
            description: input.description,
            priority: input.priority,
            state: WorkItemState::Draft,
            due_date: input.due_date,
            completed_at: None,
            estimated_hours: input.estimated_hours,
            actual_hours: 0.0,
            tags,
            reminder_ids: Vec::new(),
            is_deleted: false,
            deleted_at: None,
            audit: Audit::new(actor, now),
            revision: 0,
            pending_events: Vec::new(),
        };
        item.pending_events.push(DomainEvent::WorkItemCreated {
            tenant_id,
            work_item_id: id,
            title: item.title.clone(),
            by: actor.clone(),
            at: now,
        });
        Ok(item)
    }

    pub fn id(&self) -> WorkItemId {
        self.id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn state(&self) -> WorkItemState {
        self.state
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    pub fn actual_hours(&self) -> f64 {
        self.actual_hours
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn reminder_ids(&self) -> &[ReminderId] {
        &self.reminder_ids
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn audit(&self) -> &Audit {
        &self.audit
    }

    /// Bumped by every mutation; stores compare it on write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_archived(&self) -> bool {
        self.state == WorkItemState::Archived
    }

    pub fn start(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(WorkItemState::InProgress, actor, now)
    }

    pub fn complete(&mut self, actor: &Actor, actual_hours: f64, now: DateTime<Utc>) -> Result<()> {
        self.ensure_transition(WorkItemState::Completed)?;
        validate_hours("actual hours", actual_hours)?;
        self.actual_hours = actual_hours;
        self.completed_at = Some(now);
        self.transition_to(WorkItemState::Completed, actor, now)
    }

    pub fn hold(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(WorkItemState::OnHold, actor, now)
    }

    pub fn cancel(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(WorkItemState::Cancelled, actor, now)
    }

    pub fn archive(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.transition_to(WorkItemState::Archived, actor, now)
    }

    /// Generic entry point used by commands that carry the target state as data.
    pub fn transition_to(
        &mut self,
        target: WorkItemState,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_transition(target)?;
        let from = self.state;
        self.state = target;
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::WorkItemStateChanged {
            tenant_id: self.tenant_id,
            work_item_id: self.id,
            from,
            to: target,
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    /// Attach a reminder. Rejected once the item is archived or deleted.
    pub fn add_reminder(
        &mut self,
        reminder: &Reminder,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_mutable()?;
        if self.is_deleted {
            return Err(DocketError::invalid_state(format!(
                "work item {} is deleted",
                self.id
            )));
        }
        if reminder.work_item_id() != self.id || reminder.tenant_id() != self.tenant_id {
            return Err(DocketError::validation(format!(
                "reminder {} does not belong to work item {}",
                reminder.id(),
                self.id
            )));
        }
        if !self.reminder_ids.contains(&reminder.id()) {
            self.reminder_ids.push(reminder.id());
        }
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::ReminderScheduled {
            tenant_id: self.tenant_id,
            work_item_id: self.id,
            reminder_id: reminder.id(),
            trigger_at: reminder.trigger_at(),
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    /// Take back a reminder id whose reminder was never stored. Raises no event.
    pub fn detach_reminder(&mut self, reminder_id: ReminderId, actor: &Actor, now: DateTime<Utc>) -> bool {
        let before = self.reminder_ids.len();
        self.reminder_ids.retain(|id| *id != reminder_id);
        if self.reminder_ids.len() == before {
            return false;
        }
        self.touch(actor, now);
        true
    }

    /// Add a tag. An exact duplicate is a no-op.
    pub fn add_tag(&mut self, tag: impl Into<String>, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.ensure_mutable()?;
        let tag = tag.into();
        validate_tag(&tag)?;
        if self.tags.contains(&tag) {
            return Ok(());
        }
        if self.tags.len() >= MAX_TAGS {
            return Err(DocketError::validation(format!(
                "a work item can carry at most {MAX_TAGS} tags"
            )));
        }
        self.tags.push(tag.clone());
        self.touch_with(format!("tag added: {tag}"), actor, now);
        Ok(())
    }

    pub fn set_due_date(
        &mut self,
        due_date: Option<DateTime<Utc>>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_mutable()?;
        self.due_date = due_date;
        let change = match due_date {
            Some(d) => format!("due date set to {}", d.to_rfc3339()),
            None => "due date cleared".to_string(),
        };
        self.touch_with(change, actor, now);
        Ok(())
    }

    /// Soft delete. `state` is left as it is.
    pub fn mark_as_deleted(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
        self.ensure_mutable()?;
        if self.is_deleted {
            return Ok(());
        }
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::WorkItemDeleted {
            tenant_id: self.tenant_id,
            work_item_id: self.id,
            by: actor.clone(),
            at: now,
        });
        Ok(())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.state.is_closed(),
            None => false,
        }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_archived() {
            return Err(DocketError::invalid_state(format!(
                "work item {} is archived",
                self.id
            )));
        }
        Ok(())
    }

    fn ensure_transition(&self, target: WorkItemState) -> Result<()> {
        self.ensure_mutable()?;
        if !self.state.can_transition_to(target) {
            return Err(DocketError::invalid_state(format!(
                "work item {} cannot move from {} to {}",
                self.id, self.state, target
            )));
        }
        Ok(())
    }

    fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.audit.touch(actor, now);
        self.revision += 1;
    }

    fn touch_with(&mut self, change: String, actor: &Actor, now: DateTime<Utc>) {
        self.touch(actor, now);
        self.pending_events.push(DomainEvent::WorkItemUpdated {
            tenant_id: self.tenant_id,
            work_item_id: self.id,
            change,
            by: actor.clone(),
            at: now,
        });
    }
}

/// Canonical form used for per-tenant title uniqueness.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DocketError::validation("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DocketError::validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(DocketError::validation("tag must not be empty"));
    }
    if tag.chars().count() > MAX_TAG_LEN {
        return Err(DocketError::validation(format!(
            "tag must be at most {MAX_TAG_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_hours(field: &str, hours: f64) -> Result<()> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(DocketError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}
