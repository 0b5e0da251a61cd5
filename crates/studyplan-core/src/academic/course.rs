//! Courses and fixed personal commitments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Credit weight given to new courses when none is specified.
pub const DEFAULT_COURSE_CREDITS: u32 = 3;

/// A weekly class meeting. Informational only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseMeeting {
    pub day: String,
    pub start_time: String, // HH:mm
    pub end_time: String,   // HH:mm
}

/// An enrolled course. The planner only uses its credit weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub owner_id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub schedule: Vec<CourseMeeting>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(owner_id: &str, code: &str, name: &str, semester: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            instructor: String::new(),
            credits: Some(DEFAULT_COURSE_CREDITS),
            semester: semester.to_string(),
            schedule: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A fixed block of personal time (job shift, club meeting, ...).
///
/// Accepted as planning input; sessions are not checked against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commitment {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: serde_json::Value,
}

impl Commitment {
    pub fn new(
        owner_id: &str,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            start_time,
            end_time,
            recurring: false,
            recurrence_pattern: serde_json::Value::Object(Default::default()),
        }
    }

    /// # Errors
    /// `InvalidTimeRange` unless `end_time` is after `start_time`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn commitment_requires_positive_range() {
        let start = Utc::now();
        let ok = Commitment::new("u", "Shift", start, start + Duration::hours(4));
        assert!(ok.validate().is_ok());
        assert_eq!(ok.duration_minutes(), 240);

        let bad = Commitment::new("u", "Shift", start, start);
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn course_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "c-1",
            "owner_id": "u",
            "code": "CS101",
            "name": "Intro",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.credits, None);
        assert!(course.schedule.is_empty());
    }
}
