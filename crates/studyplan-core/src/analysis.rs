//! Load, plan and persist for one owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::academic::StudySessionRecord;
use crate::error::Result;
use crate::planner::{PipelineResult, Planner};
use crate::storage::{AppliedPlan, PlannerDb};

/// What [`analyze_owner`] writes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Write priorities and recommendations to the store
    pub persist: bool,
    /// Also store the proposed sessions as scheduled
    pub accept_sessions: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            persist: true,
            accept_sessions: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub owner_id: String,
    pub analysis: PipelineResult,
    /// `None` for a dry run
    pub applied: Option<AppliedPlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_sessions: Vec<StudySessionRecord>,
    pub message: String,
}

/// Run the planner over everything stored for `owner_id`.
///
/// The plan is computed before anything is written, so a validation failure
/// leaves the store untouched. Priority write-back, recommendation inserts
/// and accepted sessions share one transaction.
///
/// # Errors
/// Returns an error if loading fails, the planner rejects the input, or a
/// write fails.
pub fn analyze_owner(
    db: &PlannerDb,
    planner: &Planner,
    owner_id: &str,
    now: DateTime<Utc>,
    options: AnalyzeOptions,
) -> Result<AnalysisReport> {
    let input = db.load_planning_input(owner_id)?;
    let analysis = planner.run_at(&input, now)?;

    if !options.persist {
        info!(owner = owner_id, "dry run, nothing stored");
        return Ok(AnalysisReport {
            owner_id: owner_id.to_string(),
            analysis,
            applied: None,
            accepted_sessions: Vec::new(),
            message: "Workload analyzed (dry run, nothing stored)".to_string(),
        });
    }

    let (applied, accepted_sessions) = if options.accept_sessions {
        db.apply_plan_with_sessions(owner_id, &analysis)?
    } else {
        (db.apply_plan(owner_id, &analysis)?, Vec::new())
    };

    Ok(AnalysisReport {
        owner_id: owner_id.to_string(),
        analysis,
        applied: Some(applied),
        accepted_sessions,
        message: "Workload analyzed and recommendations generated".to_string(),
    })
}
