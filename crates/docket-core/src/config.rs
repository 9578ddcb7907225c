//! Docket configuration.
//!
//! Read from TOML. Every key is optional; a missing key takes its default.
//!
//! ```toml
//! [scheduling]
//! lead_time_secs = 300
//!
//! [sweep]
//! interval_secs = 60
//! batch_limit = 100
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DocketError, Result};
use crate::domain::policy::{DEFAULT_LEAD_TIME_SECS, SchedulingPolicy};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocketConfig {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Minimum gap between now and a reminder's trigger time.
    #[serde(default = "default_lead_time_secs")]
    pub lead_time_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Most reminders handled per sweep run.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

fn default_lead_time_secs() -> u64 {
    DEFAULT_LEAD_TIME_SECS
}

fn default_interval_secs() -> u64 {
    60
}

fn default_batch_limit() -> usize {
    100
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            lead_time_secs: default_lead_time_secs(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            batch_limit: default_batch_limit(),
        }
    }
}

impl DocketConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocketError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| DocketError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Values serde accepts but the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep.interval_secs == 0 {
            return Err(DocketError::Config("sweep.interval_secs must be positive".into()));
        }
        if self.sweep.batch_limit == 0 {
            return Err(DocketError::Config("sweep.batch_limit must be positive".into()));
        }
        if i64::try_from(self.scheduling.lead_time_secs).is_err() {
            return Err(DocketError::Config("scheduling.lead_time_secs is too large".into()));
        }
        Ok(())
    }

    pub fn scheduling_policy(&self) -> SchedulingPolicy {
        let secs = i64::try_from(self.scheduling.lead_time_secs).unwrap_or(i64::MAX / 1000);
        SchedulingPolicy::new(chrono::Duration::seconds(secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep.interval_secs)
    }
}
