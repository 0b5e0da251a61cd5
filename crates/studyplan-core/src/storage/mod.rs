mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, ProfileConfig};
pub use database::{AppliedPlan, AssignmentStats, PlannerDb};

use std::path::PathBuf;

/// Returns the directory holding the database and `config.toml`.
///
/// `STUDYPLAN_DATA_DIR` wins when set. Otherwise `~/.config/studyplan[-dev]/`,
/// with the `-dev` suffix when `STUDYPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("STUDYPLAN_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyplan-dev")
            } else {
                base_dir.join("studyplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
