//! Academic domain types: assignments, courses, commitments, study sessions
//! and recommendations.
//!
//! These are the records exchanged between the store, the planner and the
//! CLI. Planner-derived values (priority, urgency, days until due) live on
//! [`crate::planner::PrioritizedAssignment`], not here.

mod assignment;
mod course;
mod recommendation;
mod session;

pub use assignment::{
    parse_due_date, Assignment, AssignmentStatus, Priority, DEFAULT_EFFORT_HOURS,
};
pub use course::{Commitment, Course, CourseMeeting, DEFAULT_COURSE_CREDITS};
pub use recommendation::{
    Recommendation, RecommendationStatus, RecommendationType, StoredRecommendation, TaskSummary,
};
pub use session::{SessionStatus, StudySession, StudySessionRecord};
