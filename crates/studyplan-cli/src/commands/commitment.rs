use clap::Subcommand;
use studyplan_core::Commitment;

use super::{parse_timestamp, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum CommitmentAction {
    /// Block out personal time
    Create {
        /// Commitment title
        title: String,
        /// Start time (RFC 3339)
        #[arg(long)]
        start: String,
        /// End time (RFC 3339)
        #[arg(long)]
        end: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Mark as recurring
        #[arg(long)]
        recurring: bool,
        /// Recurrence pattern as JSON (e.g. '{"days":["mon","wed"]}')
        #[arg(long)]
        pattern: Option<String>,
    },
    /// List commitments by start time
    List,
}

pub fn run(ctx: &Context, action: CommitmentAction) -> CmdResult {
    match action {
        CommitmentAction::Create {
            title,
            start,
            end,
            description,
            recurring,
            pattern,
        } => {
            let start = parse_timestamp("--start", &start)?;
            let end = parse_timestamp("--end", &end)?;
            let mut commitment = Commitment::new(&ctx.user, &title, start, end);
            commitment.description = description.unwrap_or_default();
            commitment.recurring = recurring;
            if let Some(raw) = pattern {
                commitment.recurrence_pattern = serde_json::from_str(&raw)?;
            }
            ctx.db.create_commitment(&commitment)?;
            eprintln!("Commitment created: {}", commitment.id);
            print_json(&commitment)?;
        }
        CommitmentAction::List => {
            print_json(&ctx.db.list_commitments(&ctx.user)?)?;
        }
    }
    Ok(())
}
