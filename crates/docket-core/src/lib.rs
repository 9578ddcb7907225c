//! docket-core
//!
//! Multi-tenant work items with scheduled reminders that fire at most once.
//!
//! # Modules
//! - **domain**: work item and reminder state machines, scheduling policy, ids, errors, events
//! - **ports**: traits for the outside world (stores, notifier, job gateway, event sink, clock)
//! - **impls**: in-memory and tracing-backed implementations of the ports
//! - **app**: services, the due-reminder sweep, the sweep loop and the builder
//! - **config**: TOML configuration

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{AppBuilder, BuildError, Docket, ReminderService, SweepLoop, SweepReport, WorkItemService};
pub use config::DocketConfig;
pub use domain::{DocketError, Result};
