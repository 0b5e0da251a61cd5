//! Recommendations produced by the planner and their stored form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StudySession;
use crate::error::ValidationError;

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    UrgentTasks,
    StudySchedule,
    WorkloadWarning,
    DeadlineAlert,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::UrgentTasks => "urgent_tasks",
            RecommendationType::StudySchedule => "study_schedule",
            RecommendationType::WorkloadWarning => "workload_warning",
            RecommendationType::DeadlineAlert => "deadline_alert",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent_tasks" => Ok(RecommendationType::UrgentTasks),
            "study_schedule" => Ok(RecommendationType::StudySchedule),
            "workload_warning" => Ok(RecommendationType::WorkloadWarning),
            "deadline_alert" => Ok(RecommendationType::DeadlineAlert),
            other => Err(ValidationError::InvalidValue {
                field: "recommendation_type".to_string(),
                message: format!("unknown recommendation type '{other}'"),
            }),
        }
    }
}

/// Title and due date of an assignment referenced by a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSummary {
    pub title: String,
    pub due_date: String,
}

/// An actionable message for the student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub message: String,
    /// Higher is more important
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<StudySession>,
}

/// Review state of a stored recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    Pending,
    Accepted,
    Dismissed,
    Completed,
}

impl RecommendationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Accepted => "accepted",
            RecommendationStatus::Dismissed => "dismissed",
            RecommendationStatus::Completed => "completed",
        }
    }
}

impl Default for RecommendationStatus {
    fn default() -> Self {
        RecommendationStatus::Pending
    }
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RecommendationStatus::Pending),
            "accepted" => Ok(RecommendationStatus::Accepted),
            "dismissed" => Ok(RecommendationStatus::Dismissed),
            "completed" => Ok(RecommendationStatus::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown recommendation status '{other}'"),
            }),
        }
    }
}

/// A recommendation as persisted for an owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecommendation {
    pub id: String,
    pub owner_id: String,
    #[serde(rename = "recommendation_type")]
    pub kind: RecommendationType,
    pub content: Recommendation,
    pub priority: u8,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
}

impl StoredRecommendation {
    /// Wrap a freshly generated recommendation as a pending record.
    pub fn pending(owner_id: &str, content: Recommendation, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            kind: content.kind,
            priority: content.priority,
            content,
            status: RecommendationStatus::Pending,
            created_at,
        }
    }
}
