//! WorkItemStore port - ワークアイテムの永続化

use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::ids::{TenantId, WorkItemId};
use crate::domain::work_item::WorkItem;

use super::reminder_store::PutOutcome;

#[async_trait]
pub trait WorkItemStore: Send + Sync {
    async fn get(&self, id: WorkItemId) -> Result<Option<WorkItem>>;

    /// Store a new item.
    ///
    /// Must fail with `Validation` if another non-deleted item of the same
    /// tenant has the same normalized title, checked atomically with the
    /// write (a unique index on `(tenant_id, normalized_title)`).
    async fn insert(&self, item: &WorkItem) -> Result<()>;

    /// Replace the stored item iff its revision is still `expected_revision`.
    async fn put(&self, item: &WorkItem, expected_revision: u64) -> Result<PutOutcome>;

    /// True if no other item in `tenant_id` has this title.
    /// Titles compare with `work_item::normalize_title`.
    async fn is_title_unique(
        &self,
        tenant_id: TenantId,
        title: &str,
        exclude: Option<WorkItemId>,
    ) -> Result<bool>;
}
