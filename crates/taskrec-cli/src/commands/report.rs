use clap::Args;
use std::path::PathBuf;
use taskrec_core::RecommendationEngine;

use super::{load_entries, resolve_now};

#[derive(Args)]
pub struct ReportArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Report as of this RFC 3339 time instead of now
    #[arg(long)]
    now: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// JSON time log
    #[arg(long)]
    entries: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run_progress(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let today = resolve_now(args.now.as_deref())?.date_naive();
    let progress = engine.weekly_progress(&entries, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }

    if progress.is_empty() {
        println!("No weekly goals with a target.");
    }
    for p in progress.values() {
        println!(
            "{:<20} {:>6.1}/{:<6.1}h {:>5.1}%  {:<6} {}",
            p.category,
            p.completed_hours,
            p.target_hours,
            p.percentage,
            p.priority,
            p.status.label()
        );
    }
    Ok(())
}

pub fn run_performance(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let today = resolve_now(args.now.as_deref())?.date_naive();
    let snapshot = engine.performance_snapshot(&entries, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Window: {} to {}", snapshot.window_start, snapshot.window_end);
    match snapshot.avg_daily_hours {
        Some(avg) => println!(
            "Average: {avg:.2}h/day over {} day(s), target {:.1}h",
            snapshot.days_present,
            engine.config().performance.daily_target_hours
        ),
        None => println!("No work logged in the window"),
    }
    println!("Score: {:.3}", snapshot.score);
    Ok(())
}

pub fn run_daily(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let today = resolve_now(args.now.as_deref())?.date_naive();
    let stats = engine.daily_stats(&entries, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for (day, hours) in &stats.recent_days {
        println!("{day}  {hours:.2}h");
    }
    println!(
        "Rolling average: {:.2}h of {:.1}h target ({:.0}%)  {}",
        stats.rolling_average,
        stats.target_hours,
        stats.performance_ratio * 100.0,
        stats.status.label()
    );
    Ok(())
}

pub fn run_summary(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RecommendationEngine::load()?;
    let entries = load_entries(&args.entries)?;
    let summary = engine.summary(&entries);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Total: {:.2}h", summary.total_hours);
    if summary.running_timers > 0 {
        println!("Skipped {} running timer(s)", summary.running_timers);
    }
    for day in &summary.days {
        println!("{}  {:>6.2}h  avg {:.2}h", day.date, day.hours, day.rolling_average);
    }
    for p in &summary.projects {
        println!("{:<20} {:>6.2}h", p.project, p.hours);
    }
    Ok(())
}
