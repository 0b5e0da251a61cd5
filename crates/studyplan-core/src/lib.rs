//! # Studyplan Core Library
//!
//! This library provides the core logic for studyplan, a rule-based academic
//! planner. All operations are available through the standalone `studyplan`
//! CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: a fixed four-stage pipeline (workload analysis,
//!   prioritization, session proposals, recommendations) over caller-supplied
//!   records, with the current time injected
//! - **Storage**: SQLite persistence for academic records and planner output,
//!   TOML configuration for planner thresholds
//! - **Analysis**: load, plan and persist for one owner
//!
//! ## Key Components
//!
//! - [`Planner`]: runs the pipeline and returns a [`PipelineResult`]
//! - [`PlannerDb`]: record storage and plan write-back
//! - [`Config`]: application configuration management

pub mod academic;
pub mod analysis;
pub mod error;
pub mod planner;
pub mod storage;

pub use academic::{
    Assignment, AssignmentStatus, Commitment, Course, Priority, Recommendation,
    RecommendationStatus, RecommendationType, StoredRecommendation, StudySession,
    StudySessionRecord,
};
pub use analysis::{analyze_owner, AnalysisReport, AnalyzeOptions};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use planner::{PipelineResult, Planner, PlannerConfig, PlanningInput, WorkloadLevel};
pub use storage::{Config, PlannerDb};
