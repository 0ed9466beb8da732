use assert_cmd::Command;
use predicates::prelude::*;
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

fn zpf() -> Command {
    Command::cargo_bin("zpf").unwrap()
}

/// time, 1 Hz + 30 Hz accelerometer trace and a text label, sampled at 100 Hz
fn write_recording(dir: &Path, rows: usize) -> PathBuf {
    let mut csv = String::from("time,ax,label\n");
    for i in 0..rows {
        let t = i as f64 / 100.0;
        let ax = (2.0 * PI * t).sin() + (2.0 * PI * 30.0 * t).sin();
        writeln!(csv, "{t},{ax},trial{}", i / 50).unwrap();
    }

    let path = dir.join("SM14.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn filter_args(cmd: &mut Command) -> &mut Command {
    cmd.args(["--cutoff", "8", "--sample-rate", "100", "--order", "4"])
}

fn header(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_usage() {
    zpf()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_flag() {
    zpf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--sample-rate"))
        .stdout(predicate::str::contains("--keep-non-numeric"));
}

// =============================================================================
// FILTERING
// =============================================================================

#[test]
fn test_filters_numeric_columns_to_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);
    let expected = dir.path().join("SM14_filtered.csv");

    filter_args(zpf().arg(&input))
        .assert()
        .success()
        .stdout(predicate::str::contains("SM14_filtered.csv"))
        .stderr(predicate::str::contains("filtering column"))
        .stderr(predicate::str::contains("ax_filt"));

    assert_eq!(header(&expected), "time_filt,ax_filt");
    let rows = std::fs::read_to_string(&expected).unwrap().lines().count();
    assert_eq!(rows, 201);
}

#[test]
fn test_keep_non_numeric_and_custom_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);
    let output = dir.path().join("out.csv");

    filter_args(zpf().arg(&input))
        .args(["--keep-non-numeric", "--suffix", "_lp", "-o"])
        .arg(&output)
        .assert()
        .success();

    assert_eq!(header(&output), "time_lp,ax_lp,label");
}

#[test]
fn test_parallel_output_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 300);
    let sequential = dir.path().join("seq.csv");
    let parallel = dir.path().join("par.csv");

    filter_args(zpf().arg(&input)).arg("-o").arg(&sequential).assert().success();
    filter_args(zpf().arg(&input))
        .arg("--parallel")
        .arg("-o")
        .arg(&parallel)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&sequential).unwrap(),
        std::fs::read_to_string(&parallel).unwrap()
    );
}

#[test]
fn test_report_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);
    let report = dir.path().join("report.json");

    filter_args(zpf().arg(&input))
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert!(json["run_id"].is_string());
    assert_eq!(json["spec"]["order"], 4);
    assert_eq!(json["columns"][2]["name"], "label");
    assert_eq!(json["columns"][2]["outcome"]["status"], "dropped");
    assert_eq!(json["columns"][1]["outcome"]["status"], "filtered");
}

#[test]
fn test_config_file_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);
    let config = dir.path().join("zpf.json");
    std::fs::write(
        &config,
        r#"{"filter": {"cutoff_hz": 8.0, "sample_rate_hz": 100.0, "order": 4},
            "non_numeric": "pass_through"}"#,
    )
    .unwrap();
    let output = dir.path().join("out.csv");

    zpf()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .args(["--order", "2", "-o"])
        .arg(&output)
        .assert()
        .success();

    assert_eq!(header(&output), "time_filt,ax_filt,label");
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_missing_filter_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);

    zpf()
        .arg(&input)
        .args(["--cutoff", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sample-rate is required"));
}

#[test]
fn test_cutoff_above_nyquist_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 200);

    zpf()
        .arg(&input)
        .args(["--cutoff", "60", "--sample-rate", "100", "--order", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nyquist"));

    assert!(!dir.path().join("SM14_filtered.csv").exists());
}

#[test]
fn test_short_recording_fails_with_column_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), 10);

    filter_args(zpf().arg(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'time'"))
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn test_skip_failed_writes_remaining_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gappy.csv");
    let mut csv = String::from("good,gappy\n");
    for i in 0..100 {
        let gappy = if i == 40 { String::new() } else { i.to_string() };
        writeln!(csv, "{i},{gappy}").unwrap();
    }
    std::fs::write(&input, csv).unwrap();

    filter_args(zpf().arg(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'gappy'"));

    filter_args(zpf().arg(&input))
        .arg("--skip-failed")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping column"));

    assert_eq!(header(&dir.path().join("gappy_filtered.csv")), "good_filt");
}

#[test]
fn test_missing_input_file() {
    filter_args(zpf().arg("does/not/exist.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
