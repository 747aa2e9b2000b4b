//! End-to-end integration tests for the complete tracking flow.
//!
//! Drives the built binary through start → stop → add → report → project
//! maintenance, with `PUNCH_*` environment variables pointing every document
//! at a temp directory.

use std::process::{Command, Output};

use tempfile::TempDir;

fn punch_binary() -> String {
    env!("CARGO_BIN_EXE_punch").to_string()
}

fn punch(temp: &TempDir, args: &[&str]) -> Output {
    Command::new(punch_binary())
        .env("HOME", temp.path())
        .env("PUNCH_DATA_PATH", temp.path().join("time-data.json"))
        .env("PUNCH_SETTINGS_PATH", temp.path().join("settings.json"))
        .args(args)
        .output()
        .expect("failed to run punch")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn read_data(temp: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(temp.path().join("time-data.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn read_settings(temp: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(temp.path().join("settings.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn session_count(temp: &TempDir) -> usize {
    read_data(temp)["sessions"].as_array().unwrap().len()
}

#[test]
fn test_start_stop_records_a_session() {
    let temp = TempDir::new().unwrap();

    let output = punch(&temp, &["start", "work"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Started tracking Work"));
    assert_eq!(read_settings(&temp)["timerState"]["status"], "running");
    assert_eq!(read_settings(&temp)["timerState"]["projectId"], "work");

    let output = punch(&temp, &["stop"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Recorded"));
    assert_eq!(read_settings(&temp)["timerState"]["status"], "idle");

    let data = read_data(&temp);
    let sessions = data["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["project"], "work");
    assert!(sessions[0]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn test_stop_without_timer_is_a_noop() {
    let temp = TempDir::new().unwrap();
    let output = punch(&temp, &["stop"]);
    assert_success(&output);
    assert!(stdout(&output).contains("No timer running."));
    assert_eq!(session_count(&temp), 0);
}

#[test]
fn test_discard_drops_the_run() {
    let temp = TempDir::new().unwrap();

    assert_success(&punch(&temp, &["start", "work"]));
    let output = punch(&temp, &["discard"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Discarded"));

    assert_eq!(session_count(&temp), 0);
    assert_eq!(read_settings(&temp)["timerState"]["status"], "idle");
}

#[test]
fn test_start_while_running_switches_projects() {
    let temp = TempDir::new().unwrap();

    assert_success(&punch(&temp, &["start", "work"]));
    let output = punch(&temp, &["start", "personal"]);
    assert_success(&output);
    assert!(stdout(&output).contains("now tracking Personal"));

    // Exactly one finalized session for the first project
    assert_eq!(session_count(&temp), 1);
    assert_eq!(read_data(&temp)["sessions"][0]["project"], "work");
    assert_eq!(read_settings(&temp)["timerState"]["projectId"], "personal");

    assert_success(&punch(&temp, &["stop"]));
    assert_eq!(session_count(&temp), 2);
}

#[test]
fn test_manual_add_and_rejection() {
    let temp = TempDir::new().unwrap();

    let output = punch(
        &temp,
        &[
            "add", "--project", "work", "--date", "2024-01-01", "--start", "09:00", "--end",
            "10:30",
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("Added 1h 30m on Work"));
    assert_eq!(session_count(&temp), 1);

    let session = &read_data(&temp)["sessions"][0];
    let start: chrono::DateTime<chrono::Utc> =
        session["start"].as_str().unwrap().parse().unwrap();
    let end: chrono::DateTime<chrono::Utc> = session["end"].as_str().unwrap().parse().unwrap();
    assert_eq!((end - start).num_milliseconds(), 5_400_000);

    // Reversed interval on the same day is rejected, not silently dropped
    let output = punch(
        &temp,
        &[
            "add", "--project", "work", "--date", "2024-01-01", "--start", "10:00", "--end",
            "09:00",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not after"));
    assert_eq!(session_count(&temp), 1);
}

#[test]
fn test_report_json_is_well_formed() {
    let temp = TempDir::new().unwrap();
    assert_success(&punch(&temp, &["start", "work"]));
    assert_success(&punch(&temp, &["stop"]));

    let output = punch(&temp, &["report", "--json"]);
    assert_success(&output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["period"]["type"], "week");
    assert_eq!(report["totals"]["session_count"], 1);
    assert_eq!(report["days"].as_array().unwrap().len(), 7);
    assert_eq!(report["projects"][0]["id"], "work");
}

#[test]
fn test_session_delete_by_prefix() {
    let temp = TempDir::new().unwrap();
    assert_success(&punch(&temp, &["start", "work"]));
    assert_success(&punch(&temp, &["stop"]));

    let id = read_data(&temp)["sessions"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let output = punch(&temp, &["sessions", "delete", &id[..8]]);
    assert_success(&output);
    assert_eq!(session_count(&temp), 0);
}

#[test]
fn test_project_lifecycle_and_cascade() {
    let temp = TempDir::new().unwrap();

    let output = punch(&temp, &["projects", "add", "Deep Work", "--icon", "zap"]);
    assert_success(&output);
    let list = punch(&temp, &["projects", "list"]);
    assert!(stdout(&list).contains("deep-work"));

    // Record a session against work, then delete the project: the session
    // goes with it
    assert_success(&punch(&temp, &["start", "work"]));
    assert_success(&punch(&temp, &["stop"]));
    assert_eq!(session_count(&temp), 1);

    assert_success(&punch(&temp, &["projects", "delete", "work"]));
    assert_eq!(session_count(&temp), 0);

    // Deleting down to one project is fine; deleting the last is refused
    assert_success(&punch(&temp, &["projects", "delete", "deep-work"]));
    let output = punch(&temp, &["projects", "delete", "personal"]);
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("last remaining project")
    );
}

#[test]
fn test_status_reflects_running_timer() {
    let temp = TempDir::new().unwrap();
    assert_success(&punch(&temp, &["start", "work"]));

    let output = punch(&temp, &["status"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Timer: running Work"));
    assert!(text.contains("Streak:"));
}
