//! NotificationSender implementations.
//!
//! - [`TracingNotificationSender`] writes each notification to the log. It is
//!   what the CLI wires in when no real delivery backend exists.
//! - [`RecordingNotificationSender`] keeps every send in memory and can be told
//!   to fail for specific messages or to answer slowly.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::actor::Actor;
use crate::domain::errors::{DocketError, Result};
use crate::ports::NotificationSender;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSender;

#[async_trait]
impl NotificationSender for TracingNotificationSender {
    async fn send_reminder_notification(
        &self,
        recipient: &Actor,
        work_item_title: &str,
        message: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        tracing::info!(
            recipient = %recipient,
            work_item = work_item_title,
            due_date = ?due_date,
            "reminder: {message}"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentNotification {
    pub recipient: Actor,
    pub work_item_title: String,
    pub message: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<HashSet<String>>,
    latency: Duration,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send waits `latency` before it is recorded.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Sends whose message equals `message` fail with `Notification`.
    pub async fn fail_on(&self, message: impl Into<String>) {
        self.failing.lock().await.insert(message.into());
    }

    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_reminder_notification(
        &self,
        recipient: &Actor,
        work_item_title: &str,
        message: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.lock().await.contains(message) {
            return Err(DocketError::Notification(format!(
                "delivery to {recipient} rejected"
            )));
        }
        self.sent.lock().await.push(SentNotification {
            recipient: recipient.clone(),
            work_item_title: work_item_title.to_string(),
            message: message.to_string(),
            due_date,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_and_fails_on_request() {
        let sender = RecordingNotificationSender::new();
        sender.fail_on("broken").await;
        let bob = Actor::new("bob");

        sender
            .send_reminder_notification(&bob, "Report", "hello", None)
            .await
            .unwrap();
        let err = sender
            .send_reminder_notification(&bob, "Report", "broken", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DocketError::Notification(_)));
        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "hello");
        assert_eq!(sent[0].recipient, bob);
    }

    #[tokio::test]
    async fn tracing_sender_always_succeeds() {
        TracingNotificationSender
            .send_reminder_notification(&Actor::new("bob"), "Report", "hi", None)
            .await
            .unwrap();
    }
}
