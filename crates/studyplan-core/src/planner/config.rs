//! Tunable thresholds for the planning pipeline.
//!
//! Defaults reproduce the fixed rules of the planner. The whole structure is
//! embedded in the TOML application config under `[planner]`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Workload level boundaries in pending hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadThresholds {
    /// More than this many hours is a high workload
    #[serde(default = "default_high_hours")]
    pub high_hours: u64,
    /// More than this many hours (up to `high_hours`) is a medium workload
    #[serde(default = "default_medium_hours")]
    pub medium_hours: u64,
}

/// Session scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How many of the top-ranked assignments receive sessions
    #[serde(default = "default_max_assignments")]
    pub max_assignments: usize,
    /// Length of one study block in hours
    #[serde(default = "default_session_hours")]
    pub session_hours: u32,
    /// Hour of day (UTC) at which every block starts
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
}

/// Recommendation generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_urgent_task_limit")]
    pub urgent_task_limit: usize,
    #[serde(default = "default_session_preview_limit")]
    pub session_preview_limit: usize,
    #[serde(default = "default_high_hours")]
    pub workload_warning_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    #[serde(default)]
    pub workload: WorkloadThresholds,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

fn default_high_hours() -> u64 {
    40
}
fn default_medium_hours() -> u64 {
    20
}
fn default_max_assignments() -> usize {
    5
}
fn default_session_hours() -> u32 {
    2
}
fn default_start_hour() -> u32 {
    14
}
fn default_urgent_task_limit() -> usize {
    3
}
fn default_session_preview_limit() -> usize {
    5
}

impl Default for WorkloadThresholds {
    fn default() -> Self {
        Self {
            high_hours: default_high_hours(),
            medium_hours: default_medium_hours(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_assignments: default_max_assignments(),
            session_hours: default_session_hours(),
            start_hour: default_start_hour(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            urgent_task_limit: default_urgent_task_limit(),
            session_preview_limit: default_session_preview_limit(),
            workload_warning_hours: default_high_hours(),
        }
    }
}

impl PlannerConfig {
    /// Reject values the pipeline cannot work with.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workload.medium_hours > self.workload.high_hours {
            return Err(ConfigError::InvalidValue {
                key: "planner.workload.medium_hours".to_string(),
                message: format!(
                    "must not exceed high_hours ({})",
                    self.workload.high_hours
                ),
            });
        }
        if self.sessions.session_hours == 0 {
            return Err(ConfigError::InvalidValue {
                key: "planner.sessions.session_hours".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.sessions.start_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "planner.sessions.start_hour".to_string(),
                message: format!("{} is not an hour of the day", self.sessions.start_hour),
            });
        }
        Ok(())
    }
}
