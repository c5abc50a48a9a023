use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "taskrec-cli", version, about = "taskrec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank catalog tasks for right now
    Recommend(commands::recommend::RecommendArgs),
    /// Segment a time log into work episodes
    Episodes(commands::log::EpisodesArgs),
    /// Build completion-model training events from a time log
    Events(commands::log::EventsArgs),
    /// Weekly goal progress
    Progress(commands::report::ReportArgs),
    /// Recent performance against the daily target
    Performance(commands::report::ReportArgs),
    /// Daily hours and rolling average
    Daily(commands::report::ReportArgs),
    /// Totals per day and project for a time log
    Summary(commands::report::SummaryArgs),
    /// Task catalog management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Category mapping management
    Categories {
        #[command(subcommand)]
        action: commands::categories::CategoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Train the completion model
    Train(commands::train::TrainArgs),
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKREC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Recommend(args) => commands::recommend::run(args),
        Commands::Episodes(args) => commands::log::run_episodes(args),
        Commands::Events(args) => commands::log::run_events(args),
        Commands::Progress(args) => commands::report::run_progress(args),
        Commands::Performance(args) => commands::report::run_performance(args),
        Commands::Daily(args) => commands::report::run_daily(args),
        Commands::Summary(args) => commands::report::run_summary(args),
        Commands::Task { action } => commands::task::run(action),
        Commands::Categories { action } => commands::categories::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Train(args) => commands::train::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "taskrec-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
