//! State - ワークアイテムと reminder の状態

use serde::{Deserialize, Serialize};
use std::fmt;

/// Work item lifecycle.
///
/// ```text
/// Draft ──► InProgress ──► Completed ──► Archived
///   │  ▲        │
///   │  └─ OnHold ◄┘
///   └──────────────► Cancelled ──► Archived
/// ```
///
/// `Archived` is terminal. `Completed` and `Cancelled` only move on to `Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemState {
    Draft,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
    Archived,
}

impl WorkItemState {
    pub const ALL: [WorkItemState; 6] = [
        WorkItemState::Draft,
        WorkItemState::InProgress,
        WorkItemState::Completed,
        WorkItemState::OnHold,
        WorkItemState::Cancelled,
        WorkItemState::Archived,
    ];

    /// The transition table. Both the imperative transitions on `WorkItem`
    /// and `SchedulingPolicy::can_transition_to_state` read from here.
    pub fn can_transition_to(self, target: WorkItemState) -> bool {
        use WorkItemState::*;
        match (self, target) {
            (Archived, _) => false,
            (_, Archived) => true,
            (Draft | OnHold, InProgress) => true,
            (InProgress, Completed) => true,
            (Draft | InProgress, OnHold) => true,
            (Draft | InProgress | OnHold, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WorkItemState::Archived
    }

    /// States in which an item no longer counts as overdue.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            WorkItemState::Completed | WorkItemState::Archived | WorkItemState::Cancelled
        )
    }
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkItemState::Draft => "draft",
            WorkItemState::InProgress => "in_progress",
            WorkItemState::Completed => "completed",
            WorkItemState::OnHold => "on_hold",
            WorkItemState::Cancelled => "cancelled",
            WorkItemState::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// ReminderStatus は reminder の状態
///
/// `Scheduled` 以外はすべて終端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Scheduled,
    Triggered,
    Cancelled,
    Failed,
}

impl ReminderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReminderStatus::Scheduled)
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Triggered => "triggered",
            ReminderStatus::Cancelled => "cancelled",
            ReminderStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}
