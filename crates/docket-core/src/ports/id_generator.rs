//! IdGenerator port - ID 生成の抽象化
//!
//! ULID のタイムスタンプ部は注入された `Clock` から取る。

use ulid::Ulid;

use crate::domain::ids::{ReminderId, WorkItemId};
use crate::ports::Clock;

pub trait IdGenerator: Send + Sync {
    fn generate_work_item_id(&self) -> WorkItemId;

    fn generate_reminder_id(&self) -> ReminderId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_work_item_id(&self) -> WorkItemId {
        WorkItemId::from(self.next_ulid())
    }

    fn generate_reminder_id(&self) -> ReminderId {
        ReminderId::from(self.next_ulid())
    }
}
