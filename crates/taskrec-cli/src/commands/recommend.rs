use clap::Args;
use std::path::PathBuf;
use taskrec_core::{CompletionModel, LogisticModel, RecommendationEngine};

use super::{load_entries, resolve_now};

#[derive(Args)]
pub struct RecommendArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Number of tasks to show (default: ranking.top_n)
    #[arg(long)]
    top: Option<usize>,
    /// Trained completion model
    #[arg(long)]
    model: Option<PathBuf>,
    /// Score as of this RFC 3339 time instead of now
    #[arg(long)]
    now: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let now = resolve_now(args.now.as_deref())?;
    let model = args.model.as_deref().map(LogisticModel::load).transpose()?;

    let recs = engine.top_recommendations(
        &entries,
        now,
        model.as_ref().map(|m| m as &dyn CompletionModel),
        args.top,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    if recs.is_empty() {
        println!("No tasks in the catalog. Add one with `taskrec-cli task add`.");
        return Ok(());
    }
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "{}. {} [{}] difficulty {} ~{:.1}h  score {:.3}",
            i + 1,
            rec.task_name,
            rec.category,
            rec.difficulty,
            rec.estimated_duration,
            rec.priority_score
        );
        println!("   {}", rec.reasoning);
    }
    Ok(())
}
