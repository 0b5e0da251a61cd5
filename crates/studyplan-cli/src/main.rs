use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Rule-based academic planner")]
struct Cli {
    /// Owner id to act for (default: profile.user_id from config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Database file (default: <data dir>/studyplan.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assignment management
    Assignment {
        #[command(subcommand)]
        action: commands::assignment::AssignmentAction,
    },
    /// Course management
    Course {
        #[command(subcommand)]
        action: commands::course::CourseAction,
    },
    /// Personal commitment management
    Commitment {
        #[command(subcommand)]
        action: commands::commitment::CommitmentAction,
    },
    /// Study session management
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Run the planner over stored data
    Analyze(commands::analyze::AnalyzeArgs),
    /// Stored recommendations
    Recommendation {
        #[command(subcommand)]
        action: commands::recommendation::RecommendationAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("STUDYPLAN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Ignore a second init; stdout stays reserved for JSON output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (user, db) = (cli.user, cli.db);
    let context = || commands::Context::load(user, db);
    let result = match cli.command {
        Commands::Assignment { action } => {
            context().and_then(|ctx| commands::assignment::run(&ctx, action))
        }
        Commands::Course { action } => context().and_then(|ctx| commands::course::run(&ctx, action)),
        Commands::Commitment { action } => {
            context().and_then(|ctx| commands::commitment::run(&ctx, action))
        }
        Commands::Session { action } => context().and_then(|ctx| commands::session::run(&ctx, action)),
        Commands::Analyze(args) => context().and_then(|ctx| commands::analyze::run(&ctx, args)),
        Commands::Recommendation { action } => {
            context().and_then(|ctx| commands::recommendation::run(&ctx, action))
        }
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
