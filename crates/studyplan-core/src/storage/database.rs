//! SQLite-based storage for academic records and planner output.
//!
//! Provides persistent storage for:
//! - Courses, assignments and personal commitments (planner input)
//! - Accepted study sessions
//! - Recommendations and their lifecycle status

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::data_dir;
use super::migrations;
use crate::academic::{
    Assignment, AssignmentStatus, Commitment, Course, RecommendationStatus, StoredRecommendation,
    StudySession, StudySessionRecord,
};
use crate::error::{CoreError, DatabaseError, Result};
use crate::planner::{PipelineResult, PlanningInput};

// === Helper Functions ===

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Read an RFC 3339 timestamp column
fn timestamp_at(row: &rusqlite::Row, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn optional_timestamp_at(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| conversion_error(idx, e)),
        None => Ok(None),
    }
}

/// Read a text column through the type's `FromStr`
fn parsed_at<T>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

/// Read a JSON text column
fn json_at<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

const ASSIGNMENT_COLUMNS: &str = "id, owner_id, course_id, title, description, due_date,
     estimated_hours, status, priority, completed_at, created_at";

fn row_to_assignment(row: &rusqlite::Row) -> Result<Assignment, rusqlite::Error> {
    let status: String = row.get(7)?;
    let priority = match row.get::<_, Option<String>>(8)? {
        Some(raw) => Some(raw.parse().map_err(|e| conversion_error(8, e))?),
        None => None,
    };

    Ok(Assignment {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        course_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        due_date: row.get(5)?,
        estimated_hours: row.get(6)?,
        status: AssignmentStatus::from(status),
        priority,
        completed_at: optional_timestamp_at(row, 9)?,
        created_at: timestamp_at(row, 10)?,
    })
}

const COURSE_COLUMNS: &str =
    "id, owner_id, code, name, instructor, credits, semester, schedule, created_at";

fn row_to_course(row: &rusqlite::Row) -> Result<Course, rusqlite::Error> {
    Ok(Course {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        instructor: row.get(4)?,
        credits: row.get(5)?,
        semester: row.get(6)?,
        schedule: json_at(row, 7)?,
        created_at: timestamp_at(row, 8)?,
    })
}

const COMMITMENT_COLUMNS: &str =
    "id, owner_id, title, description, start_time, end_time, recurring, recurrence_pattern";

fn row_to_commitment(row: &rusqlite::Row) -> Result<Commitment, rusqlite::Error> {
    Ok(Commitment {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_time: timestamp_at(row, 4)?,
        end_time: timestamp_at(row, 5)?,
        recurring: row.get(6)?,
        recurrence_pattern: json_at(row, 7)?,
    })
}

const SESSION_COLUMNS: &str =
    "id, owner_id, assignment_id, title, start_time, end_time, status, created_at";

fn row_to_session(row: &rusqlite::Row) -> Result<StudySessionRecord, rusqlite::Error> {
    Ok(StudySessionRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        assignment_id: row.get(2)?,
        title: row.get(3)?,
        start_time: timestamp_at(row, 4)?,
        end_time: timestamp_at(row, 5)?,
        status: parsed_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
    })
}

const RECOMMENDATION_COLUMNS: &str =
    "id, owner_id, recommendation_type, content, priority, status, created_at";

fn row_to_recommendation(row: &rusqlite::Row) -> Result<StoredRecommendation, rusqlite::Error> {
    Ok(StoredRecommendation {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        kind: parsed_at(row, 2)?,
        content: json_at(row, 3)?,
        priority: row.get(4)?,
        status: parsed_at(row, 5)?,
        created_at: timestamp_at(row, 6)?,
    })
}

fn not_found(entity: &str, id: &str) -> CoreError {
    DatabaseError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
    .into()
}

/// Assignment counts for one owner, by status.
///
/// Statuses other than the three known ones only count toward `total`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
}

/// What [`PlannerDb::apply_plan`] wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedPlan {
    /// Assignments whose priority was written back
    pub updated_assignments: usize,
    pub inserted_recommendations: Vec<StoredRecommendation>,
}

/// SQLite database for planner input and output.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/studyplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studyplan.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// See [`PlannerDb::open`].
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Assignments ===

    pub fn create_assignment(&self, assignment: &Assignment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO assignments (id, owner_id, course_id, title, description, due_date,
                                      estimated_hours, status, priority, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                assignment.id,
                assignment.owner_id,
                assignment.course_id,
                assignment.title,
                assignment.description,
                assignment.due_date,
                assignment.estimated_hours,
                assignment.status.as_str(),
                assignment.priority.map(|p| p.as_str()),
                assignment.completed_at.map(|t| t.to_rfc3339()),
                assignment.created_at.to_rfc3339(),
            ],
        )?;
        debug!(id = %assignment.id, owner = %assignment.owner_id, "assignment created");
        Ok(())
    }

    pub fn get_assignment(&self, id: &str) -> Result<Option<Assignment>> {
        let assignment = self
            .conn
            .query_row(
                &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1"),
                params![id],
                row_to_assignment,
            )
            .optional()?;
        Ok(assignment)
    }

    /// All assignments of an owner, soonest due first.
    ///
    /// Ordering compares the stored due text, so it is exact only when due
    /// dates share one format. Assignments without a due date come last.
    pub fn list_assignments(&self, owner_id: &str) -> Result<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE owner_id = ?1
             ORDER BY due_date IS NULL, due_date ASC, created_at ASC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_assignment)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Overwrite every mutable field of an existing assignment.
    ///
    /// # Errors
    /// `NotFound` if no assignment has this id.
    pub fn update_assignment(&self, assignment: &Assignment) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE assignments
             SET course_id = ?2, title = ?3, description = ?4, due_date = ?5,
                 estimated_hours = ?6, status = ?7, priority = ?8, completed_at = ?9
             WHERE id = ?1",
            params![
                assignment.id,
                assignment.course_id,
                assignment.title,
                assignment.description,
                assignment.due_date,
                assignment.estimated_hours,
                assignment.status.as_str(),
                assignment.priority.map(|p| p.as_str()),
                assignment.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        if changed == 0 {
            return Err(not_found("assignment", &assignment.id));
        }
        debug!(id = %assignment.id, "assignment updated");
        Ok(())
    }

    /// Change an assignment's status, setting `completed_at` when it becomes
    /// completed and clearing it otherwise.
    ///
    /// # Errors
    /// `NotFound` if no assignment has this id.
    pub fn set_assignment_status(
        &self,
        id: &str,
        status: AssignmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Assignment> {
        let mut assignment = self
            .get_assignment(id)?
            .ok_or_else(|| not_found("assignment", id))?;
        assignment.set_status(status, now);
        self.update_assignment(&assignment)?;
        Ok(assignment)
    }

    /// # Errors
    /// `NotFound` if no assignment has this id.
    pub fn delete_assignment(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assignments WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(not_found("assignment", id));
        }
        debug!(id, "assignment deleted");
        Ok(())
    }

    pub fn assignment_stats(&self, owner_id: &str) -> Result<AssignmentStats> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM assignments
             WHERE owner_id = ?1
             GROUP BY status",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        let mut stats = AssignmentStats::default();
        for row in rows {
            let (status, count) = row?;
            stats.total += count;
            match AssignmentStatus::from(status) {
                AssignmentStatus::Pending => stats.pending += count,
                AssignmentStatus::InProgress => stats.in_progress += count,
                AssignmentStatus::Completed => stats.completed += count,
                AssignmentStatus::Other(_) => {}
            }
        }
        Ok(stats)
    }

    // === Courses ===

    pub fn create_course(&self, course: &Course) -> Result<()> {
        self.conn.execute(
            "INSERT INTO courses (id, owner_id, code, name, instructor, credits, semester,
                                  schedule, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                course.id,
                course.owner_id,
                course.code,
                course.name,
                course.instructor,
                course.credits,
                course.semester,
                serde_json::to_string(&course.schedule)?,
                course.created_at.to_rfc3339(),
            ],
        )?;
        debug!(id = %course.id, code = %course.code, "course created");
        Ok(())
    }

    pub fn list_courses(&self, owner_id: &str) -> Result<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE owner_id = ?1 ORDER BY code ASC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_course)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // === Commitments ===

    /// # Errors
    /// `InvalidTimeRange` unless the commitment ends after it starts.
    pub fn create_commitment(&self, commitment: &Commitment) -> Result<()> {
        commitment.validate()?;
        self.conn.execute(
            "INSERT INTO commitments (id, owner_id, title, description, start_time, end_time,
                                      recurring, recurrence_pattern)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                commitment.id,
                commitment.owner_id,
                commitment.title,
                commitment.description,
                commitment.start_time.to_rfc3339(),
                commitment.end_time.to_rfc3339(),
                commitment.recurring,
                serde_json::to_string(&commitment.recurrence_pattern)?,
            ],
        )?;
        debug!(id = %commitment.id, "commitment created");
        Ok(())
    }

    pub fn list_commitments(&self, owner_id: &str) -> Result<Vec<Commitment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMITMENT_COLUMNS} FROM commitments
             WHERE owner_id = ?1
             ORDER BY start_time ASC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_commitment)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // === Study sessions ===

    fn insert_session(conn: &Connection, session: &StudySessionRecord) -> Result<()> {
        if session.end_time <= session.start_time {
            return Err(crate::error::ValidationError::InvalidTimeRange {
                start: session.start_time,
                end: session.end_time,
            }
            .into());
        }
        conn.execute(
            "INSERT INTO study_sessions (id, owner_id, assignment_id, title, start_time,
                                         end_time, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.owner_id,
                session.assignment_id,
                session.title,
                session.start_time.to_rfc3339(),
                session.end_time.to_rfc3339(),
                session.status.as_str(),
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// # Errors
    /// `InvalidTimeRange` unless the session ends after it starts.
    pub fn create_study_session(&self, session: &StudySessionRecord) -> Result<()> {
        Self::insert_session(&self.conn, session)?;
        debug!(id = %session.id, "study session created");
        Ok(())
    }

    /// Store planner proposals as scheduled sessions, all or nothing.
    pub fn accept_sessions(
        &self,
        owner_id: &str,
        proposals: &[StudySession],
    ) -> Result<Vec<StudySessionRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let records = Self::insert_proposals(&tx, owner_id, proposals)?;
        tx.commit()?;
        info!(owner = owner_id, sessions = records.len(), "study sessions accepted");
        Ok(records)
    }

    fn insert_proposals(
        conn: &Connection,
        owner_id: &str,
        proposals: &[StudySession],
    ) -> Result<Vec<StudySessionRecord>> {
        let mut records = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let record = StudySessionRecord::from_proposal(owner_id, proposal);
            Self::insert_session(conn, &record)?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn list_study_sessions(&self, owner_id: &str) -> Result<Vec<StudySessionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM study_sessions
             WHERE owner_id = ?1
             ORDER BY start_time ASC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_session)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // === Planner integration ===

    /// Everything the planner needs for one owner.
    pub fn load_planning_input(&self, owner_id: &str) -> Result<PlanningInput> {
        Ok(PlanningInput {
            assignments: self.list_assignments(owner_id)?,
            courses: self.list_courses(owner_id)?,
            commitments: self.list_commitments(owner_id)?,
        })
    }

    /// Persist a planning run in one transaction.
    ///
    /// Writes each prioritized assignment's priority back and stores every
    /// recommendation as pending. Assignments of other owners are left
    /// untouched.
    pub fn apply_plan(&self, owner_id: &str, result: &PipelineResult) -> Result<AppliedPlan> {
        let tx = self.conn.unchecked_transaction()?;
        let applied = Self::write_plan(&tx, owner_id, result, Utc::now())?;
        tx.commit()?;
        info!(
            owner = owner_id,
            updated_assignments = applied.updated_assignments,
            recommendations = applied.inserted_recommendations.len(),
            "plan applied"
        );
        Ok(applied)
    }

    /// Like [`apply_plan`](Self::apply_plan), also storing the proposed
    /// sessions in the same transaction. A rejected session rolls back the
    /// priorities and recommendations too.
    pub fn apply_plan_with_sessions(
        &self,
        owner_id: &str,
        result: &PipelineResult,
    ) -> Result<(AppliedPlan, Vec<StudySessionRecord>)> {
        let tx = self.conn.unchecked_transaction()?;
        let applied = Self::write_plan(&tx, owner_id, result, Utc::now())?;
        let sessions = Self::insert_proposals(&tx, owner_id, &result.study_sessions)?;
        tx.commit()?;
        info!(
            owner = owner_id,
            updated_assignments = applied.updated_assignments,
            recommendations = applied.inserted_recommendations.len(),
            sessions = sessions.len(),
            "plan applied with sessions"
        );
        Ok((applied, sessions))
    }

    fn write_plan(
        conn: &Connection,
        owner_id: &str,
        result: &PipelineResult,
        now: DateTime<Utc>,
    ) -> Result<AppliedPlan> {
        let mut updated_assignments = 0;
        for entry in &result.assignments {
            updated_assignments += conn.execute(
                "UPDATE assignments SET priority = ?1 WHERE id = ?2 AND owner_id = ?3",
                params![entry.priority.as_str(), entry.id(), owner_id],
            )?;
        }

        let mut inserted_recommendations = Vec::with_capacity(result.recommendations.len());
        for recommendation in &result.recommendations {
            let stored = StoredRecommendation::pending(owner_id, recommendation.clone(), now);
            conn.execute(
                "INSERT INTO recommendations (id, owner_id, recommendation_type, content,
                                              priority, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    stored.id,
                    stored.owner_id,
                    stored.kind.as_str(),
                    serde_json::to_string(&stored.content)?,
                    stored.priority,
                    stored.status.as_str(),
                    stored.created_at.to_rfc3339(),
                ],
            )?;
            inserted_recommendations.push(stored);
        }

        Ok(AppliedPlan {
            updated_assignments,
            inserted_recommendations,
        })
    }

    // === Recommendations ===

    pub fn get_recommendation(&self, id: &str) -> Result<Option<StoredRecommendation>> {
        let rec = self
            .conn
            .query_row(
                &format!("SELECT {RECOMMENDATION_COLUMNS} FROM recommendations WHERE id = ?1"),
                params![id],
                row_to_recommendation,
            )
            .optional()?;
        Ok(rec)
    }

    /// Recommendations of an owner, highest priority first, newest first
    /// within a priority. `status` narrows the list when given.
    pub fn list_recommendations(
        &self,
        owner_id: &str,
        status: Option<RecommendationStatus>,
    ) -> Result<Vec<StoredRecommendation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations
             WHERE owner_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY priority DESC, created_at DESC"
        ))?;
        let rows = stmt.query_map(
            params![owner_id, status.map(|s| s.as_str())],
            row_to_recommendation,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// # Errors
    /// `NotFound` if no recommendation has this id.
    pub fn update_recommendation_status(
        &self,
        id: &str,
        status: RecommendationStatus,
    ) -> Result<StoredRecommendation> {
        let changed = self.conn.execute(
            "UPDATE recommendations SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(not_found("recommendation", id));
        }
        debug!(id, status = status.as_str(), "recommendation status updated");
        self.get_recommendation(id)?
            .ok_or_else(|| not_found("recommendation", id))
    }
}
