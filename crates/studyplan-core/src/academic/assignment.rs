//! Assignment records and their lifecycle status.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Effort assumed by the prioritizer and scheduler when an assignment has no estimate.
pub const DEFAULT_EFFORT_HOURS: u32 = 2;

/// Lifecycle status of an assignment.
///
/// Only [`AssignmentStatus::Pending`] takes part in planning. Unknown
/// statuses coming from the store are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Other(s) => s,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssignmentStatus::Pending)
    }
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        AssignmentStatus::Pending
    }
}

impl From<String> for AssignmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => AssignmentStatus::Pending,
            "in_progress" => AssignmentStatus::InProgress,
            "completed" => AssignmentStatus::Completed,
            _ => AssignmentStatus::Other(value),
        }
    }
}

impl From<&str> for AssignmentStatus {
    fn from(value: &str) -> Self {
        AssignmentStatus::from(value.to_string())
    }
}

impl From<AssignmentStatus> for String {
    fn from(value: AssignmentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planning priority assigned by the prioritizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("expected low, medium or high, got '{other}'"),
            }),
        }
    }
}

/// A piece of coursework with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw due timestamp as stored. Parsed with [`parse_due_date`] at planning time.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<u32>,
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Last persisted planning priority
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Create a pending assignment with a fresh id.
    pub fn new(owner_id: &str, title: &str, due_date: &str, estimated_hours: Option<u32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            course_id: None,
            title: title.to_string(),
            description: String::new(),
            due_date: Some(due_date.to_string()),
            estimated_hours,
            status: AssignmentStatus::Pending,
            priority: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Estimated effort in hours, falling back to [`DEFAULT_EFFORT_HOURS`].
    pub fn effort_hours(&self) -> u32 {
        self.estimated_hours.unwrap_or(DEFAULT_EFFORT_HOURS)
    }

    /// Parse the due date.
    ///
    /// # Errors
    /// `MissingField` when no due date is present, `InvalidTimestamp` when it
    /// cannot be read as an absolute time.
    pub fn due_at(&self) -> Result<DateTime<Utc>, ValidationError> {
        let raw = self
            .due_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingField {
                record: self.id.clone(),
                field: "due_date".to_string(),
            })?;

        parse_due_date(raw).ok_or_else(|| ValidationError::InvalidTimestamp {
            record: self.id.clone(),
            field: "due_date".to_string(),
            value: raw.to_string(),
        })
    }

    /// Move to a new status, keeping `completed_at` consistent with it.
    pub fn set_status(&mut self, status: AssignmentStatus, now: DateTime<Utc>) {
        self.completed_at = match status {
            AssignmentStatus::Completed => Some(self.completed_at.unwrap_or(now)),
            _ => None,
        };
        self.status = status;
    }
}

/// Parse a due timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T17:00:00Z`, `...+09:00`), naive date-times
/// (`2025-03-01T17:00:00`, `2025-03-01 17:00`) read as UTC, and bare dates
/// read as midnight UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
