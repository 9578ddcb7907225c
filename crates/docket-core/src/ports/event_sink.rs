//! EventSink port - where committed domain events go (audit log, UI refresh).
//!
//! Called after the store accepted a write. Emission is fire-and-forget:
//! implementations log their own failures and never fail the command.

use async_trait::async_trait;

use crate::domain::DomainEvent;

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, events: Vec<DomainEvent>);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _events: Vec<DomainEvent>) {}
}
