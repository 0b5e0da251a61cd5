use clap::Subcommand;
use studyplan_core::StudySessionRecord;

use super::{parse_timestamp, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List study sessions by start time
    List,
    /// Schedule a study session by hand
    Create {
        /// Session title
        title: String,
        /// Start time (RFC 3339)
        #[arg(long)]
        start: String,
        /// End time (RFC 3339)
        #[arg(long)]
        end: String,
        /// Assignment this session works on
        #[arg(long)]
        assignment: Option<String>,
    },
}

pub fn run(ctx: &Context, action: SessionAction) -> CmdResult {
    match action {
        SessionAction::List => {
            print_json(&ctx.db.list_study_sessions(&ctx.user)?)?;
        }
        SessionAction::Create {
            title,
            start,
            end,
            assignment,
        } => {
            let start = parse_timestamp("--start", &start)?;
            let end = parse_timestamp("--end", &end)?;
            let session = StudySessionRecord::new(&ctx.user, assignment, &title, start, end)?;
            ctx.db.create_study_session(&session)?;
            eprintln!("Study session created: {}", session.id);
            print_json(&session)?;
        }
    }
    Ok(())
}
