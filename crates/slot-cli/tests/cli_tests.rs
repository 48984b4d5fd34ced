//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the generate and
//! calendar subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

/// Helper: path to the request.json fixture.
fn request_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/request.json")
}

/// Helper: path to the availability.json fixture.
fn availability_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/availability.json")
}

/// Helper: run the binary and parse stdout as JSON.
fn run_json(args: &[&str], stdin: Option<&str>) -> Value {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.args(args);
    if let Some(input) = stdin {
        cmd.write_stdin(input);
    }
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout must be valid JSON")
}

const RUN_OVER_INPUT: &str =
    r#"{"range":{"begin":"2020-05-01T08:00:00Z","end":"2020-05-01T09:30:00Z"}}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Generate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn generate_stdin_to_stdout() {
    let input = std::fs::read_to_string(request_json_path()).unwrap();
    let slots = run_json(&["generate", "--length", "60", "--interval", "15"], Some(&input));

    assert_eq!(
        slots,
        json!([
            {
                "start_time": "2020-05-01T08:00:00Z",
                "end_time": "2020-05-01T09:00:00Z",
                "time": "08:00 AM"
            },
            {
                "start_time": "2020-05-01T10:00:00Z",
                "end_time": "2020-05-01T11:00:00Z",
                "time": "10:00 AM"
            }
        ])
    );
}

#[test]
fn generate_plain_format() {
    let slots = run_json(
        &["generate", "-i", request_json_path(), "--interval", "15", "--format", "plain"],
        None,
    );
    assert_eq!(slots, json!(["08:00 AM", "10:00 AM"]));
}

#[test]
fn generate_calendar_format_carries_metadata() {
    let slots = run_json(
        &["generate", "-i", request_json_path(), "--format", "calendar"],
        None,
    );
    assert_eq!(slots.as_array().unwrap().len(), 2);
    assert_eq!(slots[0]["metadata"], json!({"doctor_id": 1}));
    assert!(slots[0].get("time").is_none());
}

#[test]
fn generate_allow_run_over() {
    let slots = run_json(
        &["generate", "--interval", "15", "--format", "plain", "--allow-run-over"],
        Some(RUN_OVER_INPUT),
    );
    assert_eq!(
        slots,
        json!(["08:00 AM", "08:15 AM", "08:30 AM", "08:45 AM", "09:00 AM", "09:15 AM"])
    );
}

#[test]
fn generate_without_run_over_stops_at_range_end() {
    let slots = run_json(
        &["generate", "--interval", "15", "--format", "plain"],
        Some(RUN_OVER_INPUT),
    );
    assert_eq!(slots, json!(["08:00 AM", "08:15 AM", "08:30 AM"]));
}

#[test]
fn generate_file_to_file() {
    let output_path = std::env::temp_dir().join("slots-test-generate-output.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("slots")
        .unwrap()
        .args(["generate", "-i", request_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let slots: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(slots.as_array().unwrap().len(), 2);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn generate_unknown_format_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args(["generate", "-i", request_json_path(), "--format", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn generate_zero_interval_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args(["generate", "-i", request_json_path(), "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
fn generate_negative_length_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args(["generate", "-i", request_json_path(), "--length", "-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid slot length"));
}

#[test]
fn generate_backwards_exclusion_fails() {
    let input = r#"{
        "range": {"begin":"2020-05-01T08:00:00Z","end":"2020-05-01T11:00:00Z"},
        "exclusions": [{"begin":"2020-05-01T10:00:00Z","end":"2020-05-01T09:00:00Z"}]
    }"#;
    Command::cargo_bin("slots")
        .unwrap()
        .arg("generate")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclusion at index 0"));
}

#[test]
fn generate_invalid_json_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .arg("generate")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse generate input JSON"));
}

#[test]
fn missing_input_file_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args(["generate", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn calendar_weekly_buckets_by_day_and_time() {
    let view = run_json(
        &["calendar", "-i", availability_json_path(), "--date", "2023-02-02"],
        None,
    );

    assert_eq!(view["starts_at"], json!("2023-01-30T00:00:00Z"));
    let days = view["slots"].as_object().unwrap();
    assert_eq!(days.len(), 7);
    assert!(days.get("2023-02-08").is_none());

    let wednesday = &days["2023-02-01"];
    let eight = wednesday["08:00 AM"].as_array().unwrap();
    assert_eq!(eight.len(), 2);
    assert_eq!(eight[0]["metadata"], json!({"doctor_id": 1}));
    assert_eq!(eight[1]["metadata"], json!({"doctor_id": 2}));
    assert_eq!(wednesday["10:00 AM"].as_array().unwrap().len(), 1);
}

#[test]
fn calendar_offset_moves_to_next_week() {
    let view = run_json(
        &[
            "calendar",
            "-i",
            availability_json_path(),
            "--date",
            "2023-02-02",
            "--offset",
            "1",
        ],
        None,
    );

    assert_eq!(view["starts_at"], json!("2023-02-06T00:00:00Z"));
    let day = &view["slots"]["2023-02-08"];
    assert_eq!(day["01:00 PM"][0]["metadata"], json!({}));
    assert_eq!(day["02:00 PM"].as_array().unwrap().len(), 1);
}

#[test]
fn calendar_monthly_covers_every_day() {
    let view = run_json(
        &[
            "calendar",
            "-i",
            availability_json_path(),
            "--date",
            "2023-02-02",
            "--view",
            "monthly",
            "--length",
            "30",
            "--interval",
            "30",
        ],
        None,
    );

    let days = view["slots"].as_object().unwrap();
    assert_eq!(days.len(), 28);
    // 08:00-11:00 and 08:00-09:00 on the 1st, 13:00-15:00 on the 8th.
    let filed: usize = days
        .values()
        .flat_map(|day| day.as_object().unwrap().values())
        .map(|slots| slots.as_array().unwrap().len())
        .sum();
    assert_eq!(filed, 6 + 2 + 4);
}

#[test]
fn calendar_negative_offset_moves_to_previous_month() {
    let view = run_json(
        &[
            "calendar",
            "--date",
            "2023-02-02",
            "--view",
            "monthly",
            "--offset",
            "-1",
        ],
        Some("[]"),
    );
    assert_eq!(view["starts_at"], json!("2023-01-01T00:00:00Z"));
    assert_eq!(view["slots"].as_object().unwrap().len(), 31);
}

#[test]
fn calendar_backwards_availability_fails_with_index() {
    let input = r#"[
        {"range": {"begin":"2023-02-01T08:00:00Z","end":"2023-02-01T09:00:00Z"}},
        {"range": {"begin":"2023-02-01T12:00:00Z","end":"2023-02-01T09:00:00Z"}}
    ]"#;
    Command::cargo_bin("slots")
        .unwrap()
        .args(["calendar", "--date", "2023-02-02"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid availability at index 1"));
}

#[test]
fn calendar_invalid_date_fails() {
    Command::cargo_bin("slots")
        .unwrap()
        .args(["calendar", "--date", "not-a-date"])
        .write_stdin("[]")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// General CLI behavior
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("slots")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("calendar"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    let input = std::fs::read_to_string(request_json_path()).unwrap();
    Command::cargo_bin("slots")
        .unwrap()
        .args(["--verbose", "generate", "--format", "plain"])
        .env_remove("RUST_LOG")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stderr(predicate::str::contains("slots generated"));
}
