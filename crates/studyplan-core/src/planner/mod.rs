//! Rule-based study planner.
//!
//! A run passes the caller's academic data through four stages in fixed
//! order, each consuming the previous stage's output:
//!
//! 1. [`WorkloadAnalyzer`]: pending hours, credit load, workload level
//! 2. [`TaskPrioritizer`]: tiered urgency scores, sorted most urgent first
//! 3. [`SessionScheduler`]: study blocks for the top-ranked assignments
//! 4. [`RecommendationGenerator`]: actionable messages from the results above
//!
//! Stages are pure: no I/O, no shared state between runs. The only source
//! of non-determinism is the current time, which [`Planner::run_at`] takes
//! explicitly.

pub mod analyzer;
pub mod config;
pub mod prioritizer;
pub mod recommendations;
pub mod sessions;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::academic::{Assignment, Commitment, Course, Recommendation, StudySession};
use crate::error::ValidationError;

pub use analyzer::{WorkloadAnalyzer, WorkloadLevel, WorkloadSummary};
pub use config::{PlannerConfig, RecommendationConfig, SessionConfig, WorkloadThresholds};
pub use prioritizer::{PrioritizedAssignment, TaskPrioritizer};
pub use recommendations::RecommendationGenerator;
pub use sessions::SessionScheduler;

/// Caller-supplied data for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningInput {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub workload: WorkloadSummary,
    /// Pending assignments only, most urgent first
    pub assignments: Vec<PrioritizedAssignment>,
    pub study_sessions: Vec<StudySession>,
    /// In rule order; not sorted by priority
    pub recommendations: Vec<Recommendation>,
    /// One summary line per stage, in stage order
    pub log: Vec<String>,
}

/// Orchestrates the four planning stages.
pub struct Planner {
    analyzer: WorkloadAnalyzer,
    prioritizer: TaskPrioritizer,
    scheduler: SessionScheduler,
    recommender: RecommendationGenerator,
}

impl Planner {
    /// Create a planner with default thresholds
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            analyzer: WorkloadAnalyzer::with_thresholds(config.workload),
            prioritizer: TaskPrioritizer::new(),
            scheduler: SessionScheduler::with_config(config.sessions),
            recommender: RecommendationGenerator::with_config(config.recommendations),
        }
    }

    /// Run the pipeline against the current wall-clock time.
    ///
    /// # Errors
    /// See [`Planner::run_at`].
    pub fn run(&self, input: &PlanningInput) -> Result<PipelineResult, ValidationError> {
        self.run_at(input, Utc::now())
    }

    /// Run the pipeline as of `now`.
    ///
    /// # Errors
    /// Returns the first validation failure (a pending assignment with a
    /// missing or unparseable due date). Nothing is returned in that case.
    pub fn run_at(
        &self,
        input: &PlanningInput,
        now: DateTime<Utc>,
    ) -> Result<PipelineResult, ValidationError> {
        info!(
            assignments = input.assignments.len(),
            courses = input.courses.len(),
            commitments = input.commitments.len(),
            %now,
            "planning run started"
        );
        let mut log = Vec::with_capacity(4);

        let workload = self.analyzer.analyze(&input.assignments, &input.courses);
        debug!(
            pending = workload.pending_count,
            hours = workload.total_hours,
            level = %workload.workload_level,
            "workload analyzed"
        );
        log.push(workload.describe());

        let assignments = self
            .prioritizer
            .prioritize(&input.assignments, now)
            .map_err(|e| {
                warn!(error = %e, "planning run rejected input");
                e
            })?;
        debug!(prioritized = assignments.len(), "assignments prioritized");
        log.push(format!("Prioritized {} assignments", assignments.len()));

        let study_sessions = self
            .scheduler
            .schedule(&assignments, &input.commitments, now);
        debug!(sessions = study_sessions.len(), "study sessions proposed");
        log.push(format!("Scheduled {} study sessions", study_sessions.len()));

        let recommendations = self.recommender.generate(&assignments, &study_sessions);
        debug!(
            recommendations = recommendations.len(),
            "recommendations generated"
        );
        log.push(format!(
            "Generated {} recommendations",
            recommendations.len()
        ));

        info!(
            prioritized = assignments.len(),
            sessions = study_sessions.len(),
            recommendations = recommendations.len(),
            "planning run finished"
        );

        Ok(PipelineResult {
            workload,
            assignments,
            study_sessions,
            recommendations,
            log,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic::RecommendationType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_produces_empty_plan_with_full_log() {
        let result = Planner::new().run_at(&PlanningInput::default(), now()).unwrap();
        assert!(result.assignments.is_empty());
        assert!(result.study_sessions.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.workload.workload_level, WorkloadLevel::Low);
        assert_eq!(
            result.log,
            vec![
                "Workload analysis: 0 pending assignments, 0h estimated, 0 credits, workload low",
                "Prioritized 0 assignments",
                "Scheduled 0 study sessions",
                "Generated 0 recommendations",
            ]
        );
    }

    #[test]
    fn configured_thresholds_flow_into_stages() {
        let mut config = PlannerConfig::default();
        config.recommendations.workload_warning_hours = 5;
        config.sessions.max_assignments = 0;

        let due = (now() + Duration::days(9)).to_rfc3339();
        let input = PlanningInput {
            assignments: vec![Assignment::new("u", "Lab report", &due, Some(6))],
            ..Default::default()
        };
        let result = Planner::with_config(config).run_at(&input, now()).unwrap();
        assert!(result.study_sessions.is_empty());
        let kinds: Vec<_> = result.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RecommendationType::WorkloadWarning]);
    }
}
