//! CLI tests against the built binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use std::path::PathBuf;

use predicates::prelude::*;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ab_campaign.xlsx")
}

fn bidtest() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("bidtest").expect("binary builds")
}

#[test]
fn test_full_report_on_fixture() {
    bidtest()
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Shapiro-Wilk [Control]"))
        .stdout(predicate::str::contains("Shapiro-Wilk [Test]"))
        .stdout(predicate::str::contains("Levene"))
        .stdout(predicate::str::contains("Independent two-sample t-test"))
        .stdout(predicate::str::contains("Fail to reject H0"));
}

#[test]
fn test_describe_tables_shown_by_default() {
    bidtest()
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("SHAPE"))
        .stdout(predicate::str::contains("DESCRIBE"))
        .stdout(predicate::str::contains("Rows: 40"));
}

#[test]
fn test_no_describe_suppresses_tables() {
    bidtest()
        .arg(fixture())
        .arg("--no-describe")
        .assert()
        .success()
        .stdout(predicate::str::contains("SHAPE").not())
        .stdout(predicate::str::contains("Shapiro-Wilk"));
}

#[test]
fn test_json_format_is_machine_readable() {
    let output = bidtest()
        .arg(fixture())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["alpha"], 0.05);
    assert_eq!(json["decision"], "FailToRejectH0");
}

#[test]
fn test_missing_workbook_fails_with_message() {
    bidtest()
        .arg("/nonexistent/ab_campaign.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_malformed_workbook_fails_cleanly() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not an xlsx archive").expect("write file");

    bidtest()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("broken.xlsx"));
}

#[test]
fn test_missing_sheet_fails_with_sheet_name() {
    bidtest()
        .arg(fixture())
        .arg("--test-sheet")
        .arg("Holdout Group")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Holdout Group"));
}

#[test]
fn test_alpha_flag_changes_decision() {
    // Fixture comparison p is about 0.34: loosening alpha past it flips the
    // decision to rejection
    bidtest()
        .arg(fixture())
        .arg("--no-describe")
        .arg("--alpha")
        .arg("0.6")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reject H0"));
}
