use clap::Subcommand;
use studyplan_core::RecommendationStatus;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum RecommendationAction {
    /// List recommendations, highest priority first
    List {
        /// Filter by status (pending, accepted, dismissed, completed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Change a recommendation's status
    Update {
        /// Recommendation ID
        id: String,
        /// New status (pending, accepted, dismissed, completed)
        status: String,
    },
}

pub fn run(ctx: &Context, action: RecommendationAction) -> CmdResult {
    match action {
        RecommendationAction::List { status } => {
            let status = status
                .map(|s| s.parse::<RecommendationStatus>())
                .transpose()?;
            print_json(&ctx.db.list_recommendations(&ctx.user, status)?)?;
        }
        RecommendationAction::Update { id, status } => {
            let status: RecommendationStatus = status.parse()?;
            let updated = ctx.db.update_recommendation_status(&id, status)?;
            print_json(&updated)?;
        }
    }
    Ok(())
}
