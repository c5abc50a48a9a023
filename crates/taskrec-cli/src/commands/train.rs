use clap::Args;
use std::path::PathBuf;
use taskrec_core::training::{train_completion_model, TrainingConfig};
use taskrec_core::RecommendationEngine;

use super::load_entries;

#[derive(Args)]
pub struct TrainArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Where to write the fitted model
    #[arg(long)]
    out: PathBuf,
    /// Seed for class balancing
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn auc(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a (single class)".to_string(), |v| format!("{v:.3}"))
}

pub fn run(args: TrainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let events = engine.task_events(&entries)?;

    let config = TrainingConfig {
        seed: args.seed,
        ..TrainingConfig::default()
    };
    let (model, report) = train_completion_model(&events, &config)?;
    model.save(&args.out)?;

    println!(
        "events: {} (balanced {})  train/validation/test: {}/{}/{}",
        report.events, report.balanced_events, report.train_rows, report.validation_rows, report.test_rows
    );
    println!("validation AUC: {}", auc(report.validation_auc));
    println!("test AUC: {}", auc(report.test_auc));
    if !model.is_usable() {
        println!("warning: training data has a single class; the model will not adjust scores");
    }
    println!("model written to {}", args.out.display());
    Ok(())
}
