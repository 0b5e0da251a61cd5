use chrono::Utc;
use clap::Args;
use studyplan_core::{analyze_owner, AnalyzeOptions, Planner};

use super::{parse_timestamp, print_json, CmdResult, Context};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Plan as of this time (RFC 3339) instead of now
    #[arg(long)]
    now: Option<String>,
    /// Print the plan without storing priorities or recommendations
    #[arg(long)]
    dry_run: bool,
    /// Store the proposed study sessions as scheduled
    #[arg(long, conflicts_with = "dry_run")]
    accept_sessions: bool,
}

pub fn run(ctx: &Context, args: AnalyzeArgs) -> CmdResult {
    let now = match args.now {
        Some(raw) => parse_timestamp("--now", &raw)?,
        None => Utc::now(),
    };
    let options = AnalyzeOptions {
        persist: !args.dry_run,
        accept_sessions: args.accept_sessions,
    };

    let planner = Planner::with_config(ctx.config.planner.clone());
    let report = analyze_owner(&ctx.db, &planner, &ctx.user, now, options)?;
    for line in &report.analysis.log {
        tracing::info!("{line}");
    }
    eprintln!("{}", report.message);
    print_json(&report)
}
