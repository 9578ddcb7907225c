//! Impls - in-process implementations of the ports.
//!
//! Everything here keeps its state in memory. They back the CLI demo and the
//! tests; production adapters (SQL stores, a real job scheduler, mail) live in
//! separate crates and implement the same traits.

pub mod event_sinks;
pub mod inmem_job_gateway;
pub mod inmem_reminder_store;
pub mod inmem_work_item_store;
pub mod notifiers;

pub use self::event_sinks::{RecordingEventSink, TracingEventSink};
pub use self::inmem_job_gateway::{InMemoryJobGateway, JobSchedule, ScheduledJob};
pub use self::inmem_reminder_store::InMemoryReminderStore;
pub use self::inmem_work_item_store::InMemoryWorkItemStore;
pub use self::notifiers::{RecordingNotificationSender, SentNotification, TracingNotificationSender};
