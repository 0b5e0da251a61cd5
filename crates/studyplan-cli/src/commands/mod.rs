pub mod analyze;
pub mod assignment;
pub mod commitment;
pub mod config;
pub mod course;
pub mod recommendation;
pub mod session;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use studyplan_core::{Config, PlannerDb};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Shared state for commands that touch the database.
pub struct Context {
    pub user: String,
    pub config: Config,
    pub db: PlannerDb,
}

impl Context {
    /// Resolve the owner and open the database.
    pub fn load(
        user: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let user = user.unwrap_or_else(|| config.profile.user_id.clone());
        let db = match db_path {
            Some(path) => PlannerDb::open_at(&path)?,
            None => PlannerDb::open()?,
        };
        tracing::debug!(user = %user, "command context ready");
        Ok(Self { user, config, db })
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse an RFC 3339 timestamp given on the command line.
pub fn parse_timestamp(flag: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid {flag} '{raw}': {e} (expected RFC 3339)"))
}
