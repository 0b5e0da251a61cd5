//! Workload analysis: how much pending work is there, in coarse terms.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::WorkloadThresholds;
use crate::academic::{Assignment, Course};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadLevel {
    Low,
    Medium,
    High,
}

impl WorkloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadLevel::Low => "low",
            WorkloadLevel::Medium => "medium",
            WorkloadLevel::High => "high",
        }
    }
}

impl fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub pending_count: usize,
    pub total_hours: u64,
    pub total_credits: u64,
    pub workload_level: WorkloadLevel,
}

impl WorkloadSummary {
    /// One-line description for the run log.
    pub fn describe(&self) -> String {
        format!(
            "Workload analysis: {} pending assignments, {}h estimated, {} credits, workload {}",
            self.pending_count, self.total_hours, self.total_credits, self.workload_level
        )
    }
}

/// Sum of estimated hours over pending assignments; missing estimates count as 0.
pub fn pending_hours<'a, I>(assignments: I) -> u64
where
    I: IntoIterator<Item = &'a Assignment>,
{
    assignments
        .into_iter()
        .filter(|a| a.is_pending())
        .map(|a| u64::from(a.estimated_hours.unwrap_or(0)))
        .sum()
}

pub struct WorkloadAnalyzer {
    thresholds: WorkloadThresholds,
}

impl WorkloadAnalyzer {
    pub fn new() -> Self {
        Self {
            thresholds: WorkloadThresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: WorkloadThresholds) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, assignments: &[Assignment], courses: &[Course]) -> WorkloadSummary {
        let pending_count = assignments.iter().filter(|a| a.is_pending()).count();
        let total_hours = pending_hours(assignments);
        let total_credits = courses
            .iter()
            .map(|c| u64::from(c.credits.unwrap_or(0)))
            .sum();

        WorkloadSummary {
            pending_count,
            total_hours,
            total_credits,
            workload_level: self.classify(total_hours),
        }
    }

    /// Bucket a pending-hour total: above `high_hours` is high, above
    /// `medium_hours` is medium, anything else low.
    pub fn classify(&self, total_hours: u64) -> WorkloadLevel {
        if total_hours > self.thresholds.high_hours {
            WorkloadLevel::High
        } else if total_hours > self.thresholds.medium_hours {
            WorkloadLevel::Medium
        } else {
            WorkloadLevel::Low
        }
    }
}

impl Default for WorkloadAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic::AssignmentStatus;

    fn assignment(hours: Option<u32>, status: AssignmentStatus) -> Assignment {
        let mut a = Assignment::new("u", "Task", "2030-01-01", hours);
        a.status = status;
        a
    }

    #[test]
    fn classification_boundaries() {
        let analyzer = WorkloadAnalyzer::new();
        assert_eq!(analyzer.classify(0), WorkloadLevel::Low);
        assert_eq!(analyzer.classify(20), WorkloadLevel::Low);
        assert_eq!(analyzer.classify(21), WorkloadLevel::Medium);
        assert_eq!(analyzer.classify(40), WorkloadLevel::Medium);
        assert_eq!(analyzer.classify(41), WorkloadLevel::High);
    }

    #[test]
    fn only_pending_hours_count() {
        let assignments = vec![
            assignment(Some(10), AssignmentStatus::Pending),
            assignment(Some(30), AssignmentStatus::Completed),
            assignment(Some(15), AssignmentStatus::InProgress),
            assignment(None, AssignmentStatus::Pending),
        ];
        let summary = WorkloadAnalyzer::new().analyze(&assignments, &[]);
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.total_hours, 10);
        assert_eq!(summary.workload_level, WorkloadLevel::Low);
    }

    #[test]
    fn credits_sum_with_missing_as_zero() {
        let mut a = Course::new("u", "CS101", "Intro", "Fall");
        a.credits = Some(4);
        let mut b = Course::new("u", "MA201", "Calculus", "Fall");
        b.credits = None;
        let summary = WorkloadAnalyzer::new().analyze(&[], &[a, b]);
        assert_eq!(summary.total_credits, 4);
        assert_eq!(summary.pending_count, 0);
    }

    #[test]
    fn describe_mentions_level() {
        let summary = WorkloadSummary {
            pending_count: 3,
            total_hours: 45,
            total_credits: 12,
            workload_level: WorkloadLevel::High,
        };
        assert!(summary.describe().ends_with("workload high"));
    }
}
