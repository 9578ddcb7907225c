//! App - アプリケーション層
//!
//! ports を組み合わせて呼び出し側が使う操作を提供する。
//!
//! # コンポーネント
//! - **AppBuilder / Docket**: ワイヤリングと組み立て済みアプリ
//! - **ReminderService**: schedule / reschedule / trigger / cancel と due sweep
//! - **WorkItemService**: ワークアイテムのライフサイクル
//! - **SweepLoop**: shutdown まで一定間隔で sweep を実行

pub mod builder;
pub mod context;
pub mod reminders;
pub mod sweep;
pub mod sweep_loop;
pub mod work_items;

pub use self::builder::{AppBuilder, BuildError, Docket};
pub use self::context::AppContext;
pub use self::reminders::ReminderService;
pub use self::sweep::SweepReport;
pub use self::sweep_loop::SweepLoop;
pub use self::work_items::WorkItemService;
