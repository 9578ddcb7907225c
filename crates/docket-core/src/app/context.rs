//! Shared wiring for the application services.

use std::sync::Arc;

use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{ReminderId, TenantId, WorkItemId};
use crate::domain::policy::SchedulingPolicy;
use crate::domain::reminder::Reminder;
use crate::domain::work_item::WorkItem;
use crate::domain::DomainEvent;
use crate::ports::{
    Clock, EventSink, IdGenerator, JobDispatchGateway, NotificationSender, ReminderStore,
    WorkItemStore,
};

/// Ports plus policy. Built once by `AppBuilder`, shared by every service.
pub struct AppContext {
    pub reminders: Arc<dyn ReminderStore>,
    pub work_items: Arc<dyn WorkItemStore>,
    pub notifier: Arc<dyn NotificationSender>,
    pub gateway: Arc<dyn JobDispatchGateway>,
    pub events: Arc<dyn EventSink>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub policy: SchedulingPolicy,
}

impl AppContext {
    /// Load a work item that belongs to `tenant_id`.
    ///
    /// Absent and foreign items are the same `NotFound`.
    pub async fn work_item_in_tenant(
        &self,
        tenant_id: TenantId,
        id: WorkItemId,
    ) -> Result<WorkItem> {
        match self.work_items.get(id).await? {
            Some(item) if item.tenant_id() == tenant_id => Ok(item),
            _ => Err(DocketError::not_found("work item", id)),
        }
    }

    pub async fn reminder_in_tenant(&self, tenant_id: TenantId, id: ReminderId) -> Result<Reminder> {
        match self.reminders.get(id).await? {
            Some(reminder) if reminder.tenant_id() == tenant_id => Ok(reminder),
            _ => Err(DocketError::not_found("reminder", id)),
        }
    }

    pub async fn publish(&self, events: Vec<DomainEvent>) {
        if !events.is_empty() {
            self.events.emit(events).await;
        }
    }
}
