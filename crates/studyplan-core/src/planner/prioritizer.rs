//! Assignment prioritization.
//!
//! Every pending assignment is placed in a tier by two inputs, whole days
//! until due and estimated effort, using an ordered rule table (first match
//! wins):
//!
//! | days until due | effort (h) | priority | urgency |
//! |----------------|------------|----------|---------|
//! | < 2            | any        | high     | 10      |
//! | 2-4            | > 5        | high     | 7       |
//! | 2-4            | <= 5       | medium   | 5       |
//! | 5-6            | any        | medium   | 5       |
//! | >= 7           | < 3        | low      | 3       |
//! | >= 7           | >= 3       | medium   | 4       |
//!
//! The result is sorted by urgency (descending), then by days until due
//! (ascending). Downstream stages rely on index 0 being the most urgent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::academic::{Assignment, Priority};
use crate::error::ValidationError;

/// Constraint on estimated effort in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortBound {
    Any,
    Above(u32),
    AtMost(u32),
    Below(u32),
    AtLeast(u32),
}

impl EffortBound {
    fn admits(self, hours: u32) -> bool {
        match self {
            EffortBound::Any => true,
            EffortBound::Above(n) => hours > n,
            EffortBound::AtMost(n) => hours <= n,
            EffortBound::Below(n) => hours < n,
            EffortBound::AtLeast(n) => hours >= n,
        }
    }
}

/// One row of the tier table. Day bounds are inclusive; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRule {
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
    pub effort: EffortBound,
    pub priority: Priority,
    pub urgency_score: u8,
}

impl PriorityRule {
    pub fn matches(&self, days_until_due: i64, effort_hours: u32) -> bool {
        self.min_days.map_or(true, |min| days_until_due >= min)
            && self.max_days.map_or(true, |max| days_until_due <= max)
            && self.effort.admits(effort_hours)
    }
}

pub const PRIORITY_RULES: [PriorityRule; 6] = [
    PriorityRule {
        min_days: None,
        max_days: Some(1),
        effort: EffortBound::Any,
        priority: Priority::High,
        urgency_score: 10,
    },
    PriorityRule {
        min_days: Some(2),
        max_days: Some(4),
        effort: EffortBound::Above(5),
        priority: Priority::High,
        urgency_score: 7,
    },
    PriorityRule {
        min_days: Some(2),
        max_days: Some(4),
        effort: EffortBound::AtMost(5),
        priority: Priority::Medium,
        urgency_score: 5,
    },
    PriorityRule {
        min_days: Some(5),
        max_days: Some(6),
        effort: EffortBound::Any,
        priority: Priority::Medium,
        urgency_score: 5,
    },
    PriorityRule {
        min_days: Some(7),
        max_days: None,
        effort: EffortBound::Below(3),
        priority: Priority::Low,
        urgency_score: 3,
    },
    PriorityRule {
        min_days: Some(7),
        max_days: None,
        effort: EffortBound::AtLeast(3),
        priority: Priority::Medium,
        urgency_score: 4,
    },
];

/// A pending assignment annotated by the prioritizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedAssignment {
    pub assignment: Assignment,
    pub priority: Priority,
    pub urgency_score: u8,
    /// Whole days until due, rounded down; negative as soon as it is overdue
    pub days_until_due: i64,
    pub due_at: DateTime<Utc>,
}

impl PrioritizedAssignment {
    pub fn id(&self) -> &str {
        &self.assignment.id
    }

    pub fn title(&self) -> &str {
        &self.assignment.title
    }

    pub fn effort_hours(&self) -> u32 {
        self.assignment.effort_hours()
    }
}

pub struct TaskPrioritizer {
    rules: &'static [PriorityRule],
}

impl TaskPrioritizer {
    pub fn new() -> Self {
        Self {
            rules: &PRIORITY_RULES,
        }
    }

    /// First rule admitting the inputs.
    pub fn tier(&self, days_until_due: i64, effort_hours: u32) -> Option<&PriorityRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(days_until_due, effort_hours))
    }

    /// Score, annotate and order the pending assignments.
    ///
    /// Non-pending assignments are dropped from the result.
    ///
    /// # Errors
    /// Fails on the first pending assignment whose due date is missing or
    /// unparseable; no partial result is produced.
    pub fn prioritize(
        &self,
        assignments: &[Assignment],
        now: DateTime<Utc>,
    ) -> Result<Vec<PrioritizedAssignment>, ValidationError> {
        let mut prioritized = Vec::new();

        for assignment in assignments.iter().filter(|a| a.is_pending()) {
            let due_at = assignment.due_at()?;
            let days_until_due = days_until(due_at, now);
            let effort = assignment.effort_hours();

            let rule = self
                .tier(days_until_due, effort)
                .ok_or_else(|| ValidationError::InvalidValue {
                    field: "due_date".to_string(),
                    message: format!(
                        "no priority tier for {days_until_due} days / {effort}h on {}",
                        assignment.id
                    ),
                })?;

            prioritized.push(PrioritizedAssignment {
                assignment: assignment.clone(),
                priority: rule.priority,
                urgency_score: rule.urgency_score,
                days_until_due,
                due_at,
            });
        }

        prioritized.sort_by(|a, b| {
            b.urgency_score
                .cmp(&a.urgency_score)
                .then(a.days_until_due.cmp(&b.days_until_due))
        });

        Ok(prioritized)
    }
}

/// Floor of `(due_at - now)` in days, so 12 hours overdue is day -1.
pub fn days_until(due_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due_at - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

const SECONDS_PER_DAY: i64 = 86_400;

impl Default for TaskPrioritizer {
    fn default() -> Self {
        Self::new()
    }
}
