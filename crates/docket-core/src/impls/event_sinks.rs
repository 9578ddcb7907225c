//! EventSink implementations.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::DomainEvent;
use crate::ports::EventSink;

/// Logs each event as one JSON line at `info`, target `docket::events`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, events: Vec<DomainEvent>) {
        for event in events {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(
                    target: "docket::events",
                    event = event.name(),
                    tenant_id = %event.tenant_id(),
                    "{json}"
                ),
                Err(e) => tracing::warn!(
                    target: "docket::events",
                    event = event.name(),
                    error = %e,
                    "failed to serialize domain event"
                ),
            }
        }
    }
}

/// Keeps every emitted event, in emission order.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }

    pub async fn names(&self) -> Vec<&'static str> {
        self.events.lock().await.iter().map(DomainEvent::name).collect()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, events: Vec<DomainEvent>) {
        self.events.lock().await.extend(events);
    }
}
