use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("adspend").unwrap();
    cmd.env_remove("ADSPEND_BUNDLE").env_remove("ADSPEND_LOG");
    cmd
}

fn bundle_json() -> serde_json::Value {
    serde_json::from_str(include_str!("../data/bundle.json")).unwrap()
}

#[test]
fn summary_prints_headline_and_forecast_table() {
    cmd()
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Total 2025: 5.14M"))
        .stdout(contains("Forecast total 2031: 11.10M"))
        .stdout(contains("TV Nacional"));
}

#[test]
fn validate_reports_early_gaps() {
    cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("Bundle OK: 31 years (1995-2025)"))
        .stdout(contains("  1995: total"));
}

#[test]
fn rank_defaults_to_last_year() {
    cmd()
        .arg("rank")
        .assert()
        .success()
        .stdout(contains("Media ranking 2025:"))
        .stdout(contains("  1 Digital"));
}

#[test]
fn rank_outside_axis_exits_3() {
    cmd()
        .args(["rank", "--year", "1980"])
        .assert()
        .code(3)
        .stderr(contains("1980"));
}

#[test]
fn forecast_with_plot() {
    cmd()
        .args(["forecast", "--category", "digital", "--plot", "--width", "40", "--height", "10"])
        .assert()
        .success()
        .stdout(contains("Forecast: Digital (history 2008-2025"))
        .stdout(contains("Plot: Digital"));
}

#[test]
fn growth_marks_launch_year_undefined() {
    cmd()
        .args(["growth", "--category", "digital"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^2008 +41K +n/a$").unwrap());
}

#[test]
fn corr_ranks_against_reference() {
    cmd()
        .arg("corr")
        .assert()
        .success()
        .stdout(contains("Correlation with Total"))
        .stdout(contains("Digital"));

    cmd().args(["corr", "--reference", "Cine"]).assert().code(3);
}

#[test]
fn models_table_lists_trends() {
    cmd()
        .arg("models")
        .assert()
        .success()
        .stdout(contains("Revistas"))
        .stdout(contains("declining"));
}

#[test]
fn missing_bundle_file_exits_2() {
    cmd()
        .args(["--bundle", "does/not/exist.json", "summary"])
        .assert()
        .code(2)
        .stderr(contains("Dataset load failed"));
}

#[test]
fn bundle_env_var_is_honoured() {
    cmd()
        .env("ADSPEND_BUNDLE", "does/not/exist.json")
        .arg("validate")
        .assert()
        .code(2);
}

#[test]
fn asymmetric_correlation_is_rejected() {
    let mut bundle = bundle_json();
    bundle["corr"][0][1] = serde_json::json!(0.123);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    fs::write(&path, bundle.to_string()).unwrap();

    cmd()
        .arg("--bundle")
        .arg(&path)
        .arg("validate")
        .assert()
        .code(2)
        .stderr(contains("not symmetric"));
}

#[test]
fn bundle_file_equal_to_embedded_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    fs::write(&path, bundle_json().to_string()).unwrap();

    cmd()
        .arg("--bundle")
        .arg(&path)
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Total 2025: 5.14M"));
}

#[test]
fn export_writes_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    cmd()
        .arg("export")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("dashboard.json"));

    for name in ["dashboard.json", "shares.csv", "growth_total.csv"] {
        assert!(out.join(name).exists(), "missing {name}");
    }
    let growth = fs::read_to_string(out.join("growth_total.csv")).unwrap();
    assert!(growth.lines().nth(1).unwrap().starts_with("1995,total,"));
}

#[test]
fn diagnostics_writes_report() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .arg("diagnostics")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Wrote diagnostics"));

    let count = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 1);
}
