//! Study sessions: proposals from the planner and scheduled records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Priority;
use crate::error::ValidationError;

/// A study block proposed by the session scheduler.
///
/// Proposals are recreated on every planning run and never merged with
/// earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudySession {
    pub assignment_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub priority: Priority,
}

impl StudySession {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Status of a stored study session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Scheduled
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown session status '{other}'"),
            }),
        }
    }
}

/// A study session persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudySessionRecord {
    pub id: String,
    pub owner_id: String,
    pub assignment_id: Option<String>,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl StudySessionRecord {
    /// # Errors
    /// `InvalidTimeRange` unless `end_time` is after `start_time`.
    pub fn new(
        owner_id: &str,
        assignment_id: Option<String>,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            assignment_id,
            title: title.to_string(),
            start_time,
            end_time,
            status: SessionStatus::Scheduled,
            created_at: Utc::now(),
        })
    }

    /// Turn a planner proposal into a scheduled record.
    pub fn from_proposal(owner_id: &str, session: &StudySession) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            assignment_id: Some(session.assignment_id.clone()),
            title: session.title.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            status: SessionStatus::Scheduled,
            created_at: Utc::now(),
        }
    }
}
