use clap::Args;
use std::path::PathBuf;
use taskrec_core::RecommendationEngine;

use super::load_entries;

#[derive(Args)]
pub struct EpisodesArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct EventsArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Write events to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run_episodes(args: EpisodesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let episodes = engine.episodes(&entries)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&episodes)?);
        return Ok(());
    }

    for ep in &episodes {
        println!(
            "{}  {:<30} [{}] {:.0}/{:.0} min  {}",
            ep.start.format("%Y-%m-%d %H:%M"),
            ep.task_name,
            ep.category,
            ep.cum_minutes,
            ep.est_minutes,
            if ep.completed { "completed" } else { "partial" }
        );
    }
    let completed = episodes.iter().filter(|e| e.completed).count();
    println!("{} episodes, {completed} completed", episodes.len());
    Ok(())
}

pub fn run_events(args: EventsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let events = engine.task_events(&entries)?;
    let json = serde_json::to_string_pretty(&events)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("wrote {} events to {}", events.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
