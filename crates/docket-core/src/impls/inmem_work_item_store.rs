//! InMemoryWorkItemStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::{DocketError, Result};
use crate::domain::ids::{TenantId, WorkItemId};
use crate::domain::work_item::{WorkItem, normalize_title};
use crate::ports::{PutOutcome, WorkItemStore};

#[derive(Default)]
pub struct InMemoryWorkItemStore {
    rows: Mutex<HashMap<WorkItemId, WorkItem>>,
}

impl InMemoryWorkItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-deleted item of a tenant, oldest first.
    pub async fn list_for_tenant(&self, tenant_id: TenantId) -> Vec<WorkItem> {
        let rows = self.rows.lock().await;
        let mut items: Vec<WorkItem> = rows
            .values()
            .filter(|w| w.tenant_id() == tenant_id && !w.is_deleted())
            .cloned()
            .collect();
        items.sort_by_key(|w| w.id());
        items
    }

    /// Drop a row outright, simulating a record lost underneath the reminders.
    #[cfg(test)]
    pub(crate) async fn remove(&self, id: WorkItemId) {
        self.rows.lock().await.remove(&id);
    }
}

fn title_taken(
    rows: &HashMap<WorkItemId, WorkItem>,
    tenant_id: TenantId,
    title: &str,
    exclude: Option<WorkItemId>,
) -> bool {
    let wanted = normalize_title(title);
    rows.values().any(|w| {
        w.tenant_id() == tenant_id
            && !w.is_deleted()
            && Some(w.id()) != exclude
            && normalize_title(w.title()) == wanted
    })
}

fn to_row(item: &WorkItem) -> WorkItem {
    let mut row = item.clone();
    row.take_events();
    row
}

#[async_trait]
impl WorkItemStore for InMemoryWorkItemStore {
    async fn get(&self, id: WorkItemId) -> Result<Option<WorkItem>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn insert(&self, item: &WorkItem) -> Result<()> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&item.id()) {
            return Err(DocketError::Store(format!("work item {} already exists", item.id())));
        }
        if title_taken(&rows, item.tenant_id(), item.title(), None) {
            return Err(DocketError::validation(format!(
                "a work item titled {:?} already exists",
                item.title()
            )));
        }
        rows.insert(item.id(), to_row(item));
        Ok(())
    }

    async fn put(&self, item: &WorkItem, expected_revision: u64) -> Result<PutOutcome> {
        let mut rows = self.rows.lock().await;
        let Some(current) = rows.get_mut(&item.id()) else {
            return Err(DocketError::not_found("work item", item.id()));
        };
        if current.revision() != expected_revision {
            tracing::debug!(
                work_item_id = %item.id(),
                stored_revision = current.revision(),
                expected_revision,
                "conditional work item write rejected"
            );
            return Ok(PutOutcome::Conflict);
        }
        *current = to_row(item);
        Ok(PutOutcome::Applied)
    }

    async fn is_title_unique(
        &self,
        tenant_id: TenantId,
        title: &str,
        exclude: Option<WorkItemId>,
    ) -> Result<bool> {
        let rows = self.rows.lock().await;
        Ok(!title_taken(&rows, tenant_id, title, exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, NewWorkItem};
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn item(tenant: TenantId, title: &str) -> WorkItem {
        WorkItem::new(
            WorkItemId::generate(),
            tenant,
            NewWorkItem::titled(title),
            &Actor::new("alice"),
            t0(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_a_taken_title() {
        let store = InMemoryWorkItemStore::new();
        let tenant = TenantId::generate();
        store.insert(&item(tenant, "Quarterly Report")).await.unwrap();

        let err = store.insert(&item(tenant, "  quarterly report ")).await.unwrap_err();
        assert!(matches!(err, DocketError::Validation(_)));
        store.insert(&item(TenantId::generate(), "Quarterly Report")).await.unwrap();
    }

    #[tokio::test]
    async fn put_checks_revision() {
        let store = InMemoryWorkItemStore::new();
        let tenant = TenantId::generate();
        let original = item(tenant, "Ship it");
        store.insert(&original).await.unwrap();

        let mut a = store.get(original.id()).await.unwrap().unwrap();
        let mut b = a.clone();
        let rev = a.revision();
        a.start(&Actor::new("a"), t0()).unwrap();
        b.cancel(&Actor::new("b"), t0()).unwrap();

        assert_eq!(store.put(&a, rev).await.unwrap(), PutOutcome::Applied);
        assert_eq!(store.put(&b, rev).await.unwrap(), PutOutcome::Conflict);
    }

    #[tokio::test]
    async fn title_uniqueness_is_per_tenant_and_case_insensitive() {
        let store = InMemoryWorkItemStore::new();
        let tenant = TenantId::generate();
        let existing = item(tenant, "Quarterly Report");
        store.insert(&existing).await.unwrap();

        assert!(!store.is_title_unique(tenant, "  quarterly report ", None).await.unwrap());
        assert!(store.is_title_unique(TenantId::generate(), "Quarterly Report", None).await.unwrap());
        assert!(
            store
                .is_title_unique(tenant, "Quarterly Report", Some(existing.id()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn deleted_items_release_their_title() {
        let store = InMemoryWorkItemStore::new();
        let tenant = TenantId::generate();
        let mut gone = item(tenant, "Old plan");
        store.insert(&gone).await.unwrap();
        let rev = gone.revision();
        gone.mark_as_deleted(&Actor::new("alice"), t0()).unwrap();
        store.put(&gone, rev).await.unwrap();

        assert!(store.is_title_unique(tenant, "Old plan", None).await.unwrap());
        assert!(store.list_for_tenant(tenant).await.is_empty());
    }
}
