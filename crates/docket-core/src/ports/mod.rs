//! Ports - 抽象化層（ヘキサゴナルアーキテクチャの「ポート」）
//!
//! 各 trait は外部システムとのインターフェース。実装は `impls`（in-memory）
//! または別 crate に置く。
//!
//! # 役割
//! - store: 真実の源。競合を裁定する
//! - job gateway: reminder の状態を外部スケジューラへ写すだけ
//! - 通知とイベント: commit 後の副作用

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod job_gateway;
pub mod notification;
pub mod reminder_store;
pub mod work_item_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::{EventSink, NoopEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::job_gateway::{JobDispatchGateway, JobId};
pub use self::notification::NotificationSender;
pub use self::reminder_store::{PutOutcome, ReminderStore};
pub use self::work_item_store::WorkItemStore;
