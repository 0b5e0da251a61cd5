//! End-to-end planning runs with a fixed clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use studyplan_core::planner::WorkloadLevel;
use studyplan_core::{
    Assignment, AssignmentStatus, Course, Planner, PlanningInput, Priority, RecommendationType,
    ValidationError,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn due_in(days: i64) -> String {
    (now() + Duration::days(days)).to_rfc3339()
}

fn kinds(result: &studyplan_core::PipelineResult) -> Vec<RecommendationType> {
    result.recommendations.iter().map(|r| r.kind).collect()
}

#[test]
fn single_urgent_assignment() {
    let input = PlanningInput {
        assignments: vec![Assignment::new("alice", "Problem set 4", &due_in(1), Some(6))],
        courses: vec![Course::new("alice", "MATH201", "Linear Algebra", "Spring 2025")],
        commitments: Vec::new(),
    };

    let result = Planner::new().run_at(&input, now()).unwrap();

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].priority, Priority::High);
    assert_eq!(result.assignments[0].urgency_score, 10);
    assert_eq!(result.study_sessions.len(), 3);
    assert_eq!(result.workload.total_credits, 3);

    let kinds = kinds(&result);
    assert!(kinds.contains(&RecommendationType::UrgentTasks));
    assert!(kinds.contains(&RecommendationType::StudySchedule));
    assert!(kinds.contains(&RecommendationType::DeadlineAlert));
    assert!(!kinds.contains(&RecommendationType::WorkloadWarning));

    assert_eq!(
        result.log,
        vec![
            "Workload analysis: 1 pending assignments, 6h estimated, 3 credits, workload low",
            "Prioritized 1 assignments",
            "Scheduled 3 study sessions",
            "Generated 3 recommendations",
        ]
    );
}

#[test]
fn heavy_workload_far_out() {
    let assignments: Vec<_> = (0..10)
        .map(|i| Assignment::new("alice", &format!("Reading {i}"), &due_in(10), Some(5)))
        .collect();
    let input = PlanningInput {
        assignments,
        ..Default::default()
    };

    let result = Planner::new().run_at(&input, now()).unwrap();

    assert_eq!(result.workload.total_hours, 50);
    assert_eq!(result.workload.workload_level, WorkloadLevel::High);
    for entry in &result.assignments {
        assert_eq!(entry.priority, Priority::Medium);
        assert_eq!(entry.urgency_score, 4);
    }
    // five assignments scheduled, two blocks each
    assert_eq!(result.study_sessions.len(), 10);

    let kinds = kinds(&result);
    assert!(kinds.contains(&RecommendationType::WorkloadWarning));
    assert!(kinds.contains(&RecommendationType::StudySchedule));
    assert!(!kinds.contains(&RecommendationType::UrgentTasks));
    assert!(!kinds.contains(&RecommendationType::DeadlineAlert));

    let warning = result
        .recommendations
        .iter()
        .find(|r| r.kind == RecommendationType::WorkloadWarning)
        .unwrap();
    assert_eq!(
        warning.message,
        "You have 50 hours of pending work. Consider extending some deadlines or seeking help."
    );
}

#[test]
fn missing_due_date_fails_the_run() {
    let mut undated = Assignment::new("alice", "Undated", "", Some(3));
    undated.id = "a-undated".to_string();
    undated.due_date = None;
    let input = PlanningInput {
        assignments: vec![Assignment::new("alice", "Fine", &due_in(3), None), undated],
        ..Default::default()
    };

    let err = Planner::new().run_at(&input, now()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingField {
            record: "a-undated".to_string(),
            field: "due_date".to_string(),
        }
    );
    assert!(err.to_string().contains("due_date"));
    assert!(err.to_string().contains("a-undated"));
}

#[test]
fn completed_work_is_ignored_even_when_malformed() {
    let mut done = Assignment::new("alice", "Old lab", "garbage", Some(30));
    done.status = AssignmentStatus::Completed;
    let mut started = Assignment::new("alice", "Draft", &due_in(2), Some(30));
    started.status = AssignmentStatus::InProgress;
    let input = PlanningInput {
        assignments: vec![done, started],
        ..Default::default()
    };

    let result = Planner::new().run_at(&input, now()).unwrap();
    assert!(result.assignments.is_empty());
    assert!(result.study_sessions.is_empty());
    assert!(result.recommendations.is_empty());
    assert_eq!(result.workload.pending_count, 0);
}

#[test]
fn ranking_and_sessions_follow_urgency() {
    let input = PlanningInput {
        assignments: vec![
            Assignment::new("alice", "Later", &due_in(8), Some(1)),
            Assignment::new("alice", "Overdue", &due_in(-2), Some(2)),
            Assignment::new("alice", "Big midterm project", &due_in(3), Some(8)),
            Assignment::new("alice", "Quiz prep", &due_in(3), Some(2)),
        ],
        ..Default::default()
    };

    let result = Planner::new().run_at(&input, now()).unwrap();
    let order: Vec<_> = result.assignments.iter().map(|a| a.title()).collect();
    assert_eq!(order, vec!["Overdue", "Big midterm project", "Quiz prep", "Later"]);
    assert_eq!(result.assignments[0].days_until_due, -2);

    let first = &result.study_sessions[0];
    assert_eq!(first.title, "Study: Overdue");
    assert_eq!(first.start_time, Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap());
}

#[test]
fn result_serializes_with_wire_field_names() {
    let input = PlanningInput {
        assignments: vec![Assignment::new("alice", "Essay", &due_in(0), None)],
        ..Default::default()
    };
    let result = Planner::new().run_at(&input, now()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["workload"]["workload_level"], "low");
    assert_eq!(json["recommendations"][0]["type"], "urgent_tasks");
    assert_eq!(json["assignments"][0]["priority"], "high");
    assert_eq!(json["log"].as_array().unwrap().len(), 4);
}
