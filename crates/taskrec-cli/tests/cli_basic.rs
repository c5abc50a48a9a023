//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskrec-cli"))
        .env("TASKREC_DATA_DIR", data_dir)
        .env_remove("TASKREC_LOG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write_log(dir: &Path) -> String {
    let log = r#"[
        {"id": 1, "start": "2025-07-14T09:00:00+05:30", "duration": 1800, "project": "Coding", "description": "Leetcode"},
        {"id": 2, "start": "2025-07-14T09:31:00+05:30", "duration": 1740, "project": "Coding", "description": "Leetcode"},
        {"id": 3, "start": "2025-07-14T11:00:00+05:30", "duration": 1200, "project": "Research", "description": "Read paper"},
        {"id": 4, "start": "2025-07-15T08:00:00+05:30", "duration": 5400, "project": "Research", "description": "Read paper"}
    ]"#;
    let path = dir.join("entries.json");
    std::fs::write(&path, log).unwrap();
    path.to_string_lossy().into_owned()
}

fn seed_catalog(data_dir: &Path) {
    for args in [
        ["task", "add", "Leetcode", "--category", "Coding", "--difficulty", "2", "--duration", "1.0"],
        ["task", "add", "Read paper", "--category", "Research", "--difficulty", "4", "--duration", "1.5"],
    ] {
        let (_, stderr, code) = run_cli(data_dir, &args);
        assert_eq!(code, 0, "task add failed: {stderr}");
    }
    std::fs::write(
        data_dir.join("goals.json"),
        r#"{"weekly_goals": {"Coding": {"target_hours": 10, "priority": "high"}}}"#,
    )
    .unwrap();
}

#[test]
fn test_task_add_list_remove() {
    let dir = tempfile::tempdir().unwrap();
    seed_catalog(dir.path());

    let (stdout, _, code) = run_cli(dir.path(), &["task", "list", "--json"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 2);

    let (stdout, _, code) = run_cli(dir.path(), &["task", "list", "--max-difficulty", "3", "--json"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["name"], "Leetcode");
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let (_, _, code) = run_cli(dir.path(), &["task", "remove", "Leetcode"]);
    assert_eq!(code, 0);
    let (_, stderr, code) = run_cli(dir.path(), &["task", "show", "Leetcode"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Task not found"));
}

#[test]
fn test_task_add_rejects_bad_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "X", "--category", "Coding", "--difficulty", "9"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("between 1 and 5"));
}

#[test]
fn test_config_get_set_reset() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "performance.daily_target_hours"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "6.0");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "ranking.top_n", "5"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "ranking.top_n"]);
    assert_eq!(stdout.trim(), "5");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "performance.window_days", "0"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "ranking.top_n"]);
    assert_eq!(stdout.trim(), "3");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_recommend_json() {
    let dir = tempfile::tempdir().unwrap();
    seed_catalog(dir.path());
    let log = write_log(dir.path());

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["recommend", "--entries", &log, "--now", "2025-07-16T09:00:00+05:30", "--json"],
    );
    assert_eq!(code, 0, "{stderr}");
    let recs: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["task_name"], "Leetcode");
    assert!(recs[0]["reasoning"].as_str().unwrap().contains("Coding is a high priority this week"));
}

#[test]
fn test_episodes_json() {
    let dir = tempfile::tempdir().unwrap();
    seed_catalog(dir.path());
    let log = write_log(dir.path());

    let (stdout, stderr, code) = run_cli(dir.path(), &["episodes", "--entries", &log, "--json"]);
    assert_eq!(code, 0, "{stderr}");
    let episodes: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let episodes = episodes.as_array().unwrap();
    assert_eq!(episodes.len(), 3);
    // 30 + 29 minutes of a 60 minute task
    assert_eq!(episodes[0]["cum_minutes"], 59.0);
    assert_eq!(episodes[0]["completed"], true);
    assert_eq!(episodes[1]["completed"], false);
}

#[test]
fn test_events_to_file() {
    let dir = tempfile::tempdir().unwrap();
    seed_catalog(dir.path());
    let log = write_log(dir.path());
    let out = dir.path().join("events.json");

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["events", "--entries", &log, "--out", out.to_str().unwrap()],
    );
    assert_eq!(code, 0, "{stderr}");
    let events: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(events.as_array().unwrap().len(), 3);
    assert_eq!(events[0]["hour_of_day"], 9);
}

#[test]
fn test_reports() {
    let dir = tempfile::tempdir().unwrap();
    seed_catalog(dir.path());
    let log = write_log(dir.path());
    let now = "2025-07-16T09:00:00+05:30";

    let (stdout, _, code) = run_cli(dir.path(), &["progress", "--entries", &log, "--now", now, "--json"]);
    assert_eq!(code, 0);
    let progress: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(progress["Coding"]["status"], "behind");

    let (stdout, _, code) = run_cli(dir.path(), &["performance", "--entries", &log, "--now", now, "--json"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["days_present"], 2);

    let (stdout, _, code) = run_cli(dir.path(), &["daily", "--entries", &log, "--now", now]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Significantly behind"));
}

#[test]
fn test_missing_entries_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["recommend", "--entries", "/no/such/file.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot read entries"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("taskrec-cli"));
}

#[test]
fn test_summary_json() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path());

    let (stdout, stderr, code) = run_cli(dir.path(), &["summary", "--entries", &log, "--json"]);
    assert_eq!(code, 0, "{stderr}");
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    // 30 + 29 + 20 + 90 minutes
    assert_eq!(summary["total_hours"], 2.82);
    assert_eq!(summary["days"].as_array().unwrap().len(), 2);
    assert_eq!(summary["projects"][0]["project"], "Research");
    assert_eq!(summary["running_timers"], 0);
}

#[test]
fn test_categories_add_list_unmapped() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path());

    let (stdout, _, code) = run_cli(dir.path(), &["categories", "unmapped", "--entries", &log]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Leetcode"));
    assert!(stdout.contains("Read paper"));

    let (_, stderr, code) = run_cli(dir.path(), &["categories", "add", "Leetcode", "--category", "Coding"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(dir.path().join("category_mapping.json").exists());

    let (stdout, _, code) = run_cli(dir.path(), &["categories", "list", "--json"]);
    assert_eq!(code, 0);
    let categories: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(categories["Coding"][0], "Leetcode");

    let (stdout, _, _) = run_cli(dir.path(), &["categories", "unmapped", "--entries", &log]);
    assert!(!stdout.contains("Leetcode"));
    assert!(stdout.contains("Read paper"));
}

#[test]
fn test_task_add_warns_on_unmapped_category() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["categories", "add", "Leetcode", "--category", "Coding"]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "Leetcode", "--category", "Coding"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("warning"));

    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "Anki", "--category", "Language"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("warning: category 'Language'"));

    let (_, stderr, code) = run_cli(dir.path(), &["task", "summary"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Anki: Language"));
    assert!(!stderr.contains("Leetcode: Coding"));
}

#[test]
fn test_progress_orders_by_priority() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path());
    std::fs::write(
        dir.path().join("goals.json"),
        r#"{"weekly_goals": {
            "Reading": {"target_hours": 2, "priority": "low"},
            "Research": {"target_hours": 4, "priority": "someday"},
            "Coding": {"target_hours": 10, "priority": "high"}
        }}"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["progress", "--entries", &log, "--now", "2025-07-16T09:00:00+05:30"],
    );
    assert_eq!(code, 0, "{stderr}");
    let order: Vec<_> = ["Coding", "Research", "Reading"]
        .iter()
        .map(|c| stdout.find(c).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{stdout}");
    assert!(stdout.contains("medium"));
}

#[test]
fn test_config_rejects_huge_gap() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "segmentation.gap_minutes", "9223372036854775807"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("segmentation.gap_minutes"));

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "segmentation.gap_minutes"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_episodes_reject_out_of_range_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "start": "2025-07-14T09:00:00+05:30", "duration": 10000000000000, "description": "Leetcode"}]"#,
    )
    .unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["episodes", "--entries", path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("out of range"));
}
