//! Integration tests for the store as the planner's data source and sink.

use chrono::{DateTime, Duration, TimeZone, Utc};
use studyplan_core::{
    analyze_owner, AnalyzeOptions, Assignment, AssignmentStatus, Commitment, Course, CoreError,
    DatabaseError, Planner, PlannerDb, Priority, RecommendationStatus, RecommendationType,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn due_in(days: i64) -> String {
    (now() + Duration::days(days)).to_rfc3339()
}

fn seed(db: &PlannerDb, owner: &str) -> Vec<Assignment> {
    let course = Course::new(owner, "HIST110", "World History", "Spring 2025");
    db.create_course(&course).unwrap();

    let mut assignments = vec![
        Assignment::new(owner, "Source analysis", &due_in(1), Some(3)),
        Assignment::new(owner, "Term paper", &due_in(4), Some(12)),
        Assignment::new(owner, "Weekly reading", &due_in(9), Some(1)),
    ];
    for a in &mut assignments {
        a.course_id = Some(course.id.clone());
        db.create_assignment(a).unwrap();
    }

    let shift = Commitment::new(owner, "Library shift", now() + Duration::hours(30), now() + Duration::hours(34));
    db.create_commitment(&shift).unwrap();
    assignments
}

#[test]
fn full_analysis_workflow() {
    let db = PlannerDb::open_memory().unwrap();
    let assignments = seed(&db, "alice");
    seed(&db, "bob");

    let input = db.load_planning_input("alice").unwrap();
    assert_eq!(input.assignments.len(), 3);
    assert_eq!(input.courses.len(), 1);
    assert_eq!(input.commitments.len(), 1);

    let report = analyze_owner(
        &db,
        &Planner::new(),
        "alice",
        now(),
        AnalyzeOptions {
            persist: true,
            accept_sessions: true,
        },
    )
    .unwrap();

    // 3h -> 1 block, 12h -> 6 blocks, 1h -> 1 block
    assert_eq!(report.analysis.study_sessions.len(), 8);
    assert_eq!(report.accepted_sessions.len(), 8);
    assert_eq!(report.applied.as_ref().unwrap().updated_assignments, 3);

    let priorities: Vec<_> = assignments
        .iter()
        .map(|a| db.get_assignment(&a.id).unwrap().unwrap().priority)
        .collect();
    assert_eq!(
        priorities,
        vec![Some(Priority::High), Some(Priority::High), Some(Priority::Low)]
    );

    // bob's data is untouched
    assert!(db
        .list_assignments("bob")
        .unwrap()
        .iter()
        .all(|a| a.priority.is_none()));
    assert!(db.list_recommendations("bob", None).unwrap().is_empty());

    let recs = db.list_recommendations("alice", None).unwrap();
    let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[2], RecommendationType::StudySchedule);
    assert!(recs.iter().all(|r| r.status == RecommendationStatus::Pending));
    assert!(recs.iter().all(|r| r.content.kind == r.kind));
}

#[test]
fn recommendation_lifecycle() {
    let db = PlannerDb::open_memory().unwrap();
    seed(&db, "alice");
    analyze_owner(&db, &Planner::new(), "alice", now(), AnalyzeOptions::default()).unwrap();

    let pending = db
        .list_recommendations("alice", Some(RecommendationStatus::Pending))
        .unwrap();
    let target = &pending[0];
    db.update_recommendation_status(&target.id, RecommendationStatus::Accepted)
        .unwrap();

    let still_pending = db
        .list_recommendations("alice", Some(RecommendationStatus::Pending))
        .unwrap();
    assert_eq!(still_pending.len(), pending.len() - 1);
    assert!(still_pending.iter().all(|r| r.id != target.id));

    let accepted = db
        .list_recommendations("alice", Some(RecommendationStatus::Accepted))
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, target.id);
}

#[test]
fn completing_work_changes_the_next_plan() {
    let db = PlannerDb::open_memory().unwrap();
    let assignments = seed(&db, "alice");

    db.set_assignment_status(&assignments[0].id, AssignmentStatus::Completed, now())
        .unwrap();
    let stats = db.assignment_stats("alice").unwrap();
    assert_eq!((stats.total, stats.pending, stats.completed), (3, 2, 1));

    let dry_run = AnalyzeOptions {
        persist: false,
        accept_sessions: false,
    };
    let report = analyze_owner(&db, &Planner::new(), "alice", now(), dry_run).unwrap();
    assert_eq!(report.analysis.assignments.len(), 2);
    assert!(report
        .analysis
        .recommendations
        .iter()
        .all(|r| r.kind != RecommendationType::DeadlineAlert));
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyplan.db");
    {
        let db = PlannerDb::open_at(&path).unwrap();
        seed(&db, "alice");
        analyze_owner(&db, &Planner::new(), "alice", now(), AnalyzeOptions::default()).unwrap();
    }

    let db = PlannerDb::open_at(&path).unwrap();
    assert_eq!(db.list_assignments("alice").unwrap().len(), 3);
    assert!(!db.list_recommendations("alice", None).unwrap().is_empty());
}

#[test]
fn unknown_ids_are_reported() {
    let db = PlannerDb::open_memory().unwrap();
    let err = db.delete_assignment("nope").unwrap_err();
    match err {
        CoreError::Database(DatabaseError::NotFound { entity, id }) => {
            assert_eq!(entity, "assignment");
            assert_eq!(id, "nope");
        }
        other => panic!("unexpected error: {other}"),
    }
}
