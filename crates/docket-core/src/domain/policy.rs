//! SchedulingPolicy - ワークアイテムのスナップショットに対する純粋な判定
//!
//! store にも clock にも触れない。`now` は呼び出し側が渡す。

use chrono::{DateTime, Duration, Utc};

use super::errors::{DocketError, Result};
use super::reminder::validate_trigger_time;
use super::state::WorkItemState;
use super::work_item::WorkItem;

/// Default minimum gap between "now" and a reminder's trigger time.
pub const DEFAULT_LEAD_TIME_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct SchedulingPolicy {
    lead_time: Duration,
}

impl SchedulingPolicy {
    pub fn new(lead_time: Duration) -> Self {
        Self { lead_time }
    }

    pub fn lead_time(&self) -> Duration {
        self.lead_time
    }

    pub fn can_schedule_reminder(
        &self,
        item: &WorkItem,
        trigger_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.check_schedule(item, trigger_at, now).is_ok()
    }

    /// `Result` form of [`Self::can_schedule_reminder`], with the reason attached.
    pub fn check_schedule(
        &self,
        item: &WorkItem,
        trigger_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if item.is_archived() {
            return Err(DocketError::invalid_state(format!(
                "work item {} is archived",
                item.id()
            )));
        }
        if item.is_deleted() {
            return Err(DocketError::invalid_state(format!(
                "work item {} is deleted",
                item.id()
            )));
        }
        validate_trigger_time(trigger_at, now, self.lead_time)
    }

    /// `round(100 * actual / estimated)` clamped to `0..=100`; 0 without an estimate.
    pub fn calculate_progress_percentage(&self, item: &WorkItem) -> u8 {
        progress_percentage(item.estimated_hours(), item.actual_hours())
    }

    pub fn can_transition_to_state(&self, item: &WorkItem, target: WorkItemState) -> bool {
        item.state().can_transition_to(target)
    }
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_LEAD_TIME_SECS as i64))
    }
}

fn progress_percentage(estimated: f64, actual: f64) -> u8 {
    if estimated <= 0.0 {
        return 0;
    }
    let pct = (100.0 * actual / estimated).round();
    pct.clamp(0.0, 100.0) as u8
}
