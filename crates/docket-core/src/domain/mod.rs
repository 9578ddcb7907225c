//! Domain - ワークアイテム・reminder・状態機械・scheduling policy
//!
//! 同期的で I/O を持たない。

pub mod actor;
pub mod audit;
pub mod errors;
pub mod events;
pub mod ids;
pub mod policy;
pub mod reminder;
pub mod state;
pub mod work_item;

pub use actor::Actor;
pub use audit::Audit;
pub use errors::{DocketError, ErrorKind, Result};
pub use events::DomainEvent;
pub use ids::{ReminderId, TenantId, WorkItemId};
pub use policy::SchedulingPolicy;
pub use reminder::{Reminder, StatusGuard};
pub use state::{Priority, ReminderStatus, WorkItemState};
pub use work_item::{NewWorkItem, WorkItem};
