//! Integration tests for the time log -> recommendations pipeline.

use chrono::{DateTime, Duration, FixedOffset};
use taskrec_core::{
    CategoryResolver, CompletionFeatures, CompletionModel, EngineConfig, GoalCatalog, Prediction,
    RecommendationEngine, TaskCatalog, TimeEntry,
};

const TASKS_JSON: &str = r#"{
  "available_tasks": {
    "Leetcode": {"category": "Coding", "difficulty": 2, "estimated_duration": 1.0},
    "System design": {"category": "Coding", "difficulty": 5, "estimated_duration": 2.0},
    "Read paper": {"category": "Research", "difficulty": 4, "estimated_duration": 1.5},
    "Guitar": {"category": "Music", "difficulty": 1}
  },
  "difficulty_levels": {"1": "Very easy", "5": "Very hard"}
}"#;

const GOALS_JSON: &str = r#"{
  "weekly_goals": {
    "Coding": {"target_hours": 10, "priority": "high"},
    "Research": {"target_hours": 4, "priority": "medium"},
    "Reading": {"target_hours": 0, "priority": "low"}
  }
}"#;

const MAPPING_JSON: &str = r#"{
  "categories": {"Coding": ["leetcode", "system design"], "Research": ["read paper"]},
  "keywords": {"Music": ["guitar"]},
  "project_fallback": {"Work": "Coding", "General": "check_task_description"},
  "default_category": "Other"
}"#;

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn entry(id: u64, start: &str, minutes: i64, project: &str, description: &str) -> TimeEntry {
    let start = at(start);
    TimeEntry {
        id,
        start,
        stop: Some(start + Duration::minutes(minutes)),
        duration: minutes * 60,
        project: Some(project.into()),
        description: description.into(),
        tags: vec![],
    }
}

fn engine() -> (tempfile::TempDir, RecommendationEngine) {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, body: &str| {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    };
    let tasks = TaskCatalog::load(&write("tasks.json", TASKS_JSON)).unwrap();
    let goals = GoalCatalog::load(&write("goals.json", GOALS_JSON)).unwrap();
    let resolver = CategoryResolver::load(&write("category_mapping.json", MAPPING_JSON)).unwrap();
    let engine = RecommendationEngine::new(EngineConfig::default(), tasks, goals, resolver).unwrap();
    (dir, engine)
}

/// A week where Coding sits at 5/10h and the last three days average 5.4h.
fn week_log() -> Vec<TimeEntry> {
    vec![
        entry(1, "2025-07-14T09:00:00+05:30", 180, "General", "Leetcode"),
        entry(2, "2025-07-15T09:00:00+05:30", 120, "Work", "System design"),
        entry(3, "2025-07-15T14:00:00+05:30", 240, "General", "Read paper"),
        entry(4, "2025-07-16T10:00:00+05:30", 300, "General", "Stand-up"),
        entry(5, "2025-07-17T18:00:00+05:30", 252, "General", "Guitar practice"),
    ]
}

#[test]
fn categories_resolve_through_every_strategy() {
    let (_dir, engine) = engine();
    let records = engine.work_records(&week_log());
    let categories: Vec<_> = records.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["Coding", "Coding", "Research", "Other", "Music"]);
}

#[test]
fn week_scores_and_ranking() {
    let (_dir, engine) = engine();
    let log = week_log();
    let now = at("2025-07-17T20:00:00+05:30");
    let today = now.date_naive();

    let progress = engine.weekly_progress(&log, today);
    assert_eq!(progress.keys().collect::<Vec<_>>(), vec!["Coding", "Research"]);
    assert_eq!(progress["Coding"].completed_hours, 5.0);
    assert_eq!(progress["Research"].percentage, 100.0);

    let goals = engine.goal_scores(&log, today);
    assert!((goals["Coding"] - 0.96).abs() < 1e-12);
    assert_eq!(goals["Research"], 0.2);

    // days 15, 16, 17: 6h, 5h, 4.2h -> avg 5.0667 -> ratio 0.8444
    let snapshot = engine.performance_snapshot(&log, today);
    assert_eq!(snapshot.days_present, 3);
    let perf = snapshot.score;
    assert!((perf - (0.6 + (15.2 / 3.0 / 6.0 - 0.8))).abs() < 1e-12);

    let recs = engine.recommendations(&log, now, None);
    let names: Vec<_> = recs.iter().map(|r| r.task_name.as_str()).collect();
    // Coding tasks tie and keep catalog order; Music has no goal (0.5)
    assert_eq!(names, vec!["Leetcode", "System design", "Guitar", "Read paper"]);
    assert!((recs[0].priority_score - (0.4 * perf + 0.6 * 0.96)).abs() < 1e-12);
    assert_eq!(recs[0].priority_score, recs[1].priority_score);
    assert!(recs[0].reasoning.contains("Your recent performance is okay"));
    assert!(recs[3].reasoning.contains("Research goal is on track"));

    let top = engine.top_recommendations(&log, now, None, None);
    assert_eq!(top.len(), engine.config().ranking.top_n);
}

#[test]
fn high_performer_scenario() {
    let (_dir, mut engine) = engine();
    // 7h on each of the last three days against a 6h target: ratio 1.1667 -> 0.9667
    let log = vec![
        entry(1, "2025-07-15T08:00:00+05:30", 300, "Work", "Leetcode"),
        entry(2, "2025-07-15T14:00:00+05:30", 120, "General", "Guitar"),
        entry(3, "2025-07-16T08:00:00+05:30", 420, "General", "Stand-up"),
        entry(4, "2025-07-17T08:00:00+05:30", 420, "General", "Stand-up"),
    ];
    let now = at("2025-07-17T21:00:00+05:30");
    let recs = engine.recommendations(&log, now, None);
    // Coding is at 5/10h (high priority) -> 0.96
    let perf = engine.performance_score(&log, now.date_naive());
    assert!(perf >= 0.8);
    assert!((recs[0].priority_score - (0.4 * perf + 0.6 * 0.96)).abs() < 1e-12);
    assert!(recs
        .iter()
        .find(|r| r.task_name == "System design")
        .unwrap()
        .reasoning
        .contains("Challenging task while you're on a roll"));

    engine.set_daily_target(14.0).unwrap();
    assert!(engine.performance_score(&log, now.date_naive()) < 0.5);
}

#[test]
fn empty_log_is_neutral() {
    let (_dir, engine) = engine();
    let now = at("2025-07-17T09:00:00+05:30");
    assert_eq!(engine.performance_score(&[], now.date_naive()), 0.5);

    let recs = engine.recommendations(&[], now, None);
    assert_eq!(recs.len(), 4);
    let leetcode = recs.iter().find(|r| r.task_name == "Leetcode").unwrap();
    // Coding untouched: 1.0 * 1.2 capped at 1.0
    assert!((leetcode.priority_score - (0.4 * 0.5 + 0.6 * 1.0)).abs() < 1e-12);
}

struct Untrained;

impl CompletionModel for Untrained {
    fn predict(&self, _: &CompletionFeatures) -> Prediction {
        Prediction::Unavailable
    }
}

struct HourAware;

impl CompletionModel for HourAware {
    fn predict(&self, f: &CompletionFeatures) -> Prediction {
        Prediction::Probability(if f.hour_of_day < 12 { 0.9 } else { 0.3 })
    }
}

#[test]
fn models_scale_or_degrade() {
    let (_dir, engine) = engine();
    let log = week_log();
    let morning = at("2025-07-17T09:00:00+05:30");
    let evening = at("2025-07-17T21:00:00+05:30");

    let plain = engine.recommendations(&log, morning, None);
    let untrained = engine.recommendations(&log, morning, Some(&Untrained));
    for (a, b) in plain.iter().zip(&untrained) {
        assert_eq!(a.priority_score, b.priority_score);
        assert!(b.reasoning.contains("untrained"));
    }

    let am = engine.recommendations(&log, morning, Some(&HourAware));
    let pm = engine.recommendations(&log, evening, Some(&HourAware));
    assert!((am[0].priority_score - plain[0].priority_score * 0.9).abs() < 1e-12);
    assert!((pm[0].priority_score - plain[0].priority_score * 0.3).abs() < 1e-12);
    assert_eq!(pm[0].model_probability, Some(0.3));
}

#[test]
fn daily_stats_use_days_before_today() {
    let (_dir, engine) = engine();
    let stats = engine.daily_stats(&week_log(), at("2025-07-18T09:00:00+05:30").date_naive());
    // 14th-17th: 3 + 6 + 5 + 4.2 = 18.2h over a 7 day window
    assert!((stats.rolling_average - 18.2 / 7.0).abs() < 1e-12);
    assert_eq!(stats.recent_days.len(), 7);
    assert_eq!(stats.daily_hours.len(), 4);
}
