//! NotificationSender port.
//!
//! Delivery (email, chat, push) lives behind this trait. From the core's
//! point of view a send either succeeds or fails once; retries belong to the
//! notification subsystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::actor::Actor;
use crate::domain::errors::Result;

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_reminder_notification(
        &self,
        recipient: &Actor,
        work_item_title: &str,
        message: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
