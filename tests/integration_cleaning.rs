//! Integration tests for the full load, clean, export workflow
//!
//! These run the pipeline on fixture files, both through the library and
//! through the compiled `datascrub` binary.

use datascrub::cleaner::{OutputFormat, clean_data, export_data, load_data};
use datascrub::config::CleaningConfig;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from("testdata").join(name)
}

fn datascrub() -> Command {
    Command::new(env!("CARGO_BIN_EXE_datascrub"))
}

fn read_records(path: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).expect("Output should be readable");
    serde_json::from_str(&content).expect("Output should be a JSON array of records")
}

#[test]
fn test_clean_survey_csv() {
    let table = load_data(&fixture("survey.csv")).expect("Fixture should load");
    assert_eq!(table.height(), 8, "Fixture has 8 rows including one duplicate");

    let cleaned = clean_data(table, &CleaningConfig::default()).expect("Cleaning should succeed");
    assert_eq!(cleaned.height(), 7, "Only the duplicate row is dropped");

    for column in cleaned.df.get_columns() {
        assert_eq!(column.null_count(), 0, "'{}' should be complete", column.name());
    }

    let amount = cleaned
        .df
        .column("amount")
        .expect("amount column")
        .as_materialized_series()
        .clone();
    let amount = amount.f64().expect("amount should be float after imputation");
    // Median 50.5 fills the gap, then Q1 49.5 / Q3 51.5 put the upper fence at 54.5
    assert_eq!(amount.get(5), Some(54.5));
    assert_eq!(amount.get(6), Some(50.5));
}

#[test]
fn test_library_export_then_reload() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let output = dir.path().join("cleaned.xlsx");

    let table = load_data(&fixture("survey.csv")).expect("Fixture should load");
    let mut df = clean_data(table, &CleaningConfig::default())
        .expect("Cleaning should succeed")
        .into_df();
    export_data(&mut df, &output, OutputFormat::Excel).expect("Export should succeed");

    let reloaded = load_data(&output).expect("Exported workbook should load");
    assert_eq!(reloaded.height(), 7);
    assert_eq!(reloaded.width(), 4);
}

#[test]
fn test_cli_writes_json_and_log() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let output = dir.path().join("cleaned.json");
    let log = dir.path().join("run.log");

    let result = datascrub()
        .arg(fixture("survey.csv"))
        .arg("-o")
        .arg(&output)
        .args(["-f", "json"])
        .arg("--log-file")
        .arg(&log)
        .output()
        .expect("Binary should run");

    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("SUCCESS: Cleaned data saved to"));

    let records = read_records(&output);
    assert_eq!(records.len(), 7);
    assert_eq!(
        records.first().and_then(|r| r.get("name")).and_then(|v| v.as_str()),
        Some("Alice")
    );
    assert_eq!(
        records.get(1).and_then(|r| r.get("signup_date")).and_then(|v| v.as_str()),
        Some("2023-01-06")
    );

    let log_text = std::fs::read_to_string(&log).expect("Log file should exist");
    assert!(log_text.contains("Original dataset contains 8 rows"));
    assert!(log_text.contains("Final dataset contains 7 clean rows"));
}

#[test]
fn test_cli_remove_policy() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let output = dir.path().join("cleaned.csv");

    let result = datascrub()
        .arg(fixture("survey.csv"))
        .arg("-o")
        .arg(&output)
        .args(["--outlier-policy", "remove"])
        .arg("--log-file")
        .arg(dir.path().join("run.log"))
        .output()
        .expect("Binary should run");
    assert!(result.status.success());

    let cleaned = load_data(&output).expect("Output should load");
    assert_eq!(cleaned.height(), 6, "Duplicate and outlier rows are gone");
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let log = dir.path().join("run.log");

    let result = datascrub()
        .arg(dir.path().join("missing.csv"))
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .arg("--log-file")
        .arg(&log)
        .output()
        .expect("Binary should run");

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("ERROR: File not found"), "stderr: {stderr}");
    assert!(!dir.path().join("out.csv").exists());

    let log_text = std::fs::read_to_string(&log).expect("Failure should still be logged");
    assert!(log_text.contains("critical"));
}

#[test]
fn test_cli_unsupported_input_fails() {
    let dir = tempfile::tempdir().expect("Temp dir");

    let result = datascrub()
        .arg(fixture("unsupported.tsv"))
        .arg("--log-file")
        .arg(dir.path().join("run.log"))
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .output()
        .expect("Binary should run");

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("ERROR: Unsupported format"), "stderr: {stderr}");
}
