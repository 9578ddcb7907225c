//! Domain identifiers（強い型付けの ID）
//!
//! # 設計
//! - すべての ID は ULID を `Id<T>` で包んだもの（`T` は [`kind`] のゼロサイズ marker）
//! - marker はコンパイル時のみ存在し、`WorkItemId` の位置に `ReminderId` は渡せない
//! - 実行時の表現はただの 16 バイト ULID
//!
//! ULID は生成順にソートでき、store の安定した並び順はこれに依存する。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for ID kinds.
///
/// Supplies the prefix used by `Display` (`"wi-"`, `"rem-"`, ...).
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ULID-backed identifier.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Fresh id from the system clock. Services go through `IdGenerator`;
    /// this is for callers that own ids themselves (tenants, tests).
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker types. Uninhabited: they are never constructed.
pub mod kind {
    use super::IdMarker;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Tenant {}

    impl IdMarker for Tenant {
        fn prefix() -> &'static str {
            "tenant-"
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum WorkItem {}

    impl IdMarker for WorkItem {
        fn prefix() -> &'static str {
            "wi-"
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Reminder {}

    impl IdMarker for Reminder {
        fn prefix() -> &'static str {
            "rem-"
        }
    }
}

/// Identifier of a tenant. Tenants are owned outside this crate.
pub type TenantId = Id<kind::Tenant>;

/// Identifier of a work item (unique within the whole system, scoped to a tenant).
pub type WorkItemId = Id<kind::WorkItem>;

/// Identifier of a reminder.
pub type ReminderId = Id<kind::Reminder>;
