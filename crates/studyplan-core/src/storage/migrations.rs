//! Database schema migrations for studyplan.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Schema version after all migrations have run.
pub const CURRENT_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: academic records.
///
/// Timestamps are RFC 3339 text. `assignments.due_date` keeps whatever the
/// caller supplied; it is parsed at planning time. JSON columns hold the
/// course meeting list, the recurrence pattern and recommendation content.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS courses (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL,
            code        TEXT NOT NULL,
            name        TEXT NOT NULL,
            instructor  TEXT NOT NULL DEFAULT '',
            credits     INTEGER,
            semester    TEXT NOT NULL DEFAULT '',
            schedule    TEXT NOT NULL DEFAULT '[]',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS assignments (
            id              TEXT PRIMARY KEY,
            owner_id        TEXT NOT NULL,
            course_id       TEXT REFERENCES courses(id) ON DELETE SET NULL,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            due_date        TEXT,
            estimated_hours INTEGER,
            status          TEXT NOT NULL DEFAULT 'pending',
            priority        TEXT,
            completed_at    TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS commitments (
            id                 TEXT PRIMARY KEY,
            owner_id           TEXT NOT NULL,
            title              TEXT NOT NULL,
            description        TEXT NOT NULL DEFAULT '',
            start_time         TEXT NOT NULL,
            end_time           TEXT NOT NULL,
            recurring          INTEGER NOT NULL DEFAULT 0,
            recurrence_pattern TEXT NOT NULL DEFAULT 'null'
        );

        CREATE TABLE IF NOT EXISTS study_sessions (
            id            TEXT PRIMARY KEY,
            owner_id      TEXT NOT NULL,
            assignment_id TEXT REFERENCES assignments(id) ON DELETE SET NULL,
            title         TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'scheduled',
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recommendations (
            id                  TEXT PRIMARY KEY,
            owner_id            TEXT NOT NULL,
            recommendation_type TEXT NOT NULL,
            content             TEXT NOT NULL,
            priority            INTEGER NOT NULL DEFAULT 0,
            status              TEXT NOT NULL DEFAULT 'pending',
            created_at          TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    debug!("applied schema migration v1");
    Ok(())
}

/// Migration v2: indexes for the per-owner list queries.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_assignments_owner_due ON assignments(owner_id, due_date);
         CREATE INDEX IF NOT EXISTS idx_assignments_owner_status ON assignments(owner_id, status);
         CREATE INDEX IF NOT EXISTS idx_commitments_owner_start ON commitments(owner_id, start_time);
         CREATE INDEX IF NOT EXISTS idx_sessions_owner_start ON study_sessions(owner_id, start_time);
         CREATE INDEX IF NOT EXISTS idx_recommendations_owner_status
             ON recommendations(owner_id, status, priority);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    debug!("applied schema migration v2");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i32>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn migrate_from_scratch_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(schema_version(&conn), CURRENT_VERSION);
        for table in [
            "courses",
            "assignments",
            "commitments",
            "study_sessions",
            "recommendations",
        ] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn incremental_migration_from_v1_adds_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(schema_version(&conn), 1);

        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn), 2);

        let indexes: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 5);
    }

    #[test]
    fn fresh_database_reports_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        assert_eq!(schema_version(&conn), 0);
    }
}
