// The cargo_bin! macro requires build script setup that's overkill for simple tests.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn board_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/board-2030.json")
}

fn imperial() -> Command {
    Command::new(cargo_bin("imperial"))
}

const TWO_PLAYER_LOG: &str = r#"[
  {"type":"initialize","payload":{"players":[{"id":"alice","nation":"RU"},{"id":"bob","nation":"CN"}]}},
  {"type":"rondel","payload":{"nation":"RU","slot":"production1","cost":0}},
  {"type":"rondel","payload":{"nation":"RU","slot":"factory","cost":0}}
]"#;

#[test]
fn test_help_flag() {
    imperial()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--board"))
        .stdout(predicate::str::contains("--simulate"));
}

#[test]
fn test_replay_reports_state() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.json");
    std::fs::write(&log, TWO_PLAYER_LOG).unwrap();

    imperial()
        .arg("--board")
        .arg(board_path())
        .arg("--log")
        .arg(&log)
        .assert()
        .success()
        // The second RU move is not RU's turn any more
        .stdout(predicate::str::contains("Actions: 2 applied, 1 ignored"))
        .stdout(predicate::str::contains("Acting: CN (bob)"));
}

#[test]
fn test_show_actions_prints_wire_format() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.json");
    std::fs::write(&log, TWO_PLAYER_LOG).unwrap();

    imperial()
        .arg("--board")
        .arg(board_path())
        .arg("--log")
        .arg(&log)
        .arg("--show-actions")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"type":"rondel","payload":{"nation":"CN","slot":"investor","cost":0}}"#,
        ));
}

#[test]
fn test_missing_board_fails() {
    imperial()
        .arg("--board")
        .arg("/nonexistent/board.json")
        .arg("--simulate")
        .arg("2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/board.json"));
}

#[test]
fn test_missing_log_fails() {
    imperial()
        .arg("--board")
        .arg(board_path())
        .arg("--log")
        .arg("/nonexistent/log.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/log.json"));
}

#[test]
fn test_log_or_simulate_required() {
    imperial().arg("--board").arg(board_path()).assert().failure();
}

#[test]
fn test_simulate_saves_replayable_log() {
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("game.json");
    let events = dir.path().join("events.jsonl");

    let first = imperial()
        .arg("--board")
        .arg(board_path())
        .args(["--simulate", "3", "--seed", "11", "--max-actions", "200"])
        .arg("--save-log")
        .arg(&saved)
        .arg("--events")
        .arg(&events)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let event_lines = std::fs::read_to_string(&events).unwrap();
    assert!(event_lines.lines().count() > 1);
    assert!(event_lines.contains(r#""type":"action_applied""#));

    let replayed = imperial()
        .arg("--board")
        .arg(board_path())
        .arg("--log")
        .arg(&saved)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(first, replayed);
}
