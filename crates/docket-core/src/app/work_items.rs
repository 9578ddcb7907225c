//! WorkItemService - tenant-scoped work item commands.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::context::AppContext;
use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{TenantId, WorkItemId};
use crate::domain::state::WorkItemState;
use crate::domain::work_item::{NewWorkItem, WorkItem};
use crate::domain::Actor;

pub struct WorkItemService {
    ctx: Arc<AppContext>,
}

impl WorkItemService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Create a `Draft` item. The title must be unused within the tenant.
    pub async fn create_work_item(
        &self,
        tenant_id: TenantId,
        input: NewWorkItem,
        actor: &Actor,
    ) -> Result<WorkItemId> {
        let ctx = &self.ctx;
        let id = ctx.ids.generate_work_item_id();
        let mut item = WorkItem::new(id, tenant_id, input, actor, ctx.clock.now())?;
        if !ctx
            .work_items
            .is_title_unique(tenant_id, item.title(), None)
            .await?
        {
            return Err(DocketError::validation(format!(
                "a work item titled {:?} already exists",
                item.title()
            )));
        }
        ctx.work_items.insert(&item).await?;
        ctx.publish(item.take_events()).await;
        tracing::info!(tenant_id = %tenant_id, work_item_id = %id, actor = %actor, "work item created");
        Ok(id)
    }

    pub async fn get_work_item(&self, tenant_id: TenantId, id: WorkItemId) -> Result<WorkItem> {
        self.ctx.work_item_in_tenant(tenant_id, id).await
    }

    pub async fn start(&self, tenant_id: TenantId, id: WorkItemId, actor: &Actor) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.start(actor, now)).await
    }

    pub async fn complete(
        &self,
        tenant_id: TenantId,
        id: WorkItemId,
        actual_hours: f64,
        actor: &Actor,
    ) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.complete(actor, actual_hours, now))
            .await
    }

    pub async fn hold(&self, tenant_id: TenantId, id: WorkItemId, actor: &Actor) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.hold(actor, now)).await
    }

    pub async fn cancel(&self, tenant_id: TenantId, id: WorkItemId, actor: &Actor) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.cancel(actor, now)).await
    }

    pub async fn archive(&self, tenant_id: TenantId, id: WorkItemId, actor: &Actor) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.archive(actor, now)).await
    }

    /// Soft delete. The title becomes free for reuse.
    pub async fn delete(&self, tenant_id: TenantId, id: WorkItemId, actor: &Actor) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.mark_as_deleted(actor, now))
            .await
    }

    pub async fn add_tag(
        &self,
        tenant_id: TenantId,
        id: WorkItemId,
        tag: &str,
        actor: &Actor,
    ) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.add_tag(tag, actor, now))
            .await
    }

    pub async fn set_due_date(
        &self,
        tenant_id: TenantId,
        id: WorkItemId,
        due_date: Option<DateTime<Utc>>,
        actor: &Actor,
    ) -> Result<()> {
        self.mutate(tenant_id, id, |item, now| item.set_due_date(due_date, actor, now))
            .await
    }

    pub async fn progress(&self, tenant_id: TenantId, id: WorkItemId) -> Result<u8> {
        let item = self.ctx.work_item_in_tenant(tenant_id, id).await?;
        Ok(self.ctx.policy.calculate_progress_percentage(&item))
    }

    pub async fn can_transition(
        &self,
        tenant_id: TenantId,
        id: WorkItemId,
        target: WorkItemState,
    ) -> Result<bool> {
        let item = self.ctx.work_item_in_tenant(tenant_id, id).await?;
        Ok(self.ctx.policy.can_transition_to_state(&item, target))
    }

    pub async fn is_overdue(&self, tenant_id: TenantId, id: WorkItemId) -> Result<bool> {
        let item = self.ctx.work_item_in_tenant(tenant_id, id).await?;
        Ok(item.is_overdue(self.ctx.clock.now()))
    }

    /// Load, apply `f`, write back on the revision seen at load.
    async fn mutate<F>(&self, tenant_id: TenantId, id: WorkItemId, f: F) -> Result<()>
    where
        F: FnOnce(&mut WorkItem, DateTime<Utc>) -> Result<()>,
    {
        let ctx = &self.ctx;
        let mut item = ctx.work_item_in_tenant(tenant_id, id).await?;
        let expected = item.revision();
        let before = item.state();
        f(&mut item, ctx.clock.now())?;
        if item.revision() == expected {
            return Ok(());
        }
        ctx.work_items
            .put(&item, expected)
            .await?
            .into_result("work item", id)?;
        ctx.publish(item.take_events()).await;
        if item.state() != before {
            tracing::info!(
                tenant_id = %tenant_id,
                work_item_id = %id,
                from = %before,
                to = %item.state(),
                "work item state changed"
            );
        }
        Ok(())
    }
}
