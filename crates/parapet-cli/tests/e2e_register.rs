//! E2E CLI tests for the risk register surface: list/filter, add with the
//! forced-Open contract, CSV export, and the summary numbers.
//!
//! Each test runs `par` as a subprocess in an isolated temp directory with
//! the simulated latency configured to zero, so the async plumbing runs but
//! the suite stays fast.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the parapet binary, rooted in `dir`.
fn par_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("par"));
    cmd.current_dir(dir);
    // Suppress tracing output that goes to stderr
    cmd.env("PARAPET_LOG", "error");
    cmd
}

/// Create a project dir whose config removes the simulated latency.
fn project_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("parapet.toml"),
        "[service]\nlatency_ms = 0\n",
    )
    .expect("write config");
    dir
}

/// Run a command and parse its stdout as JSON.
fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_json_returns_the_seeded_register() {
    let dir = project_dir();
    let rows = json_output(par_cmd(dir.path()).args(["list", "--json"]));
    let rows = rows.as_array().expect("JSON array");
    assert_eq!(rows.len(), 3);

    let ids: Vec<u64> = rows
        .iter()
        .map(|r| r["id"].as_u64().expect("id field"))
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(rows[0]["asset"], "Customer DB");
    assert_eq!(rows[1]["status"], "Mitigation in progress");
}

#[test]
fn list_filter_is_a_case_insensitive_substring_match() {
    let dir = project_dir();
    let rows = json_output(par_cmd(dir.path()).args(["list", "--filter", "PAYROLL", "--json"]));
    let rows = rows.as_array().expect("JSON array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["asset"], "Payroll App");
}

#[test]
fn list_filter_matching_nothing_is_empty() {
    let dir = project_dir();
    let rows = json_output(par_cmd(dir.path()).args([
        "list",
        "--filter",
        "quantum mainframe",
        "--json",
    ]));
    assert_eq!(rows.as_array().map(Vec::len), Some(0));
}

#[test]
fn list_text_mode_prints_a_header_row() {
    let dir = project_dir();
    par_cmd(dir.path())
        .args(["list", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID  ASSET"))
        .stdout(predicate::str::contains("Customer DB"));
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[test]
fn add_computes_the_next_id_and_forces_open() {
    let dir = project_dir();
    let created = json_output(par_cmd(dir.path()).args([
        "add",
        "--asset",
        "New Web Server",
        "--threat",
        "SQL Injection",
        "--vuln",
        "Input validation missing",
        "--impact",
        "high",
        "--likelihood",
        "high",
        "--json",
    ]));
    assert_eq!(created["id"], 4);
    assert_eq!(created["asset"], "New Web Server");
    assert_eq!(created["impact"], "High");
    assert_eq!(created["status"], "Open");
}

#[test]
fn add_rejects_an_unknown_severity() {
    let dir = project_dir();
    par_cmd(dir.path())
        .args([
            "add",
            "--asset",
            "X",
            "--threat",
            "Y",
            "--vuln",
            "Z",
            "--impact",
            "critical",
            "--likelihood",
            "low",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical"));
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[test]
fn export_writes_header_plus_three_rows() {
    let dir = project_dir();
    par_cmd(dir.path()).args(["export"]).assert().success();

    let csv = fs::read_to_string(dir.path().join("risk_register.csv")).expect("export file");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "ID,Asset,Threat,Vulnerability,Impact,Likelihood,Status"
    );
    assert_eq!(
        lines[1],
        "1,\"Customer DB\",\"Ransomware\",\"Unpatched OS\",High,Medium,Open"
    );
    for line in &lines[1..] {
        assert_eq!(line.matches(',').count(), 6, "7 fields per row: {line}");
    }
}

#[test]
fn export_honors_an_explicit_output_path() {
    let dir = project_dir();
    let target = dir.path().join("out").join("risks.csv");
    fs::create_dir_all(target.parent().expect("parent")).expect("mkdir");

    let report = json_output(par_cmd(dir.path()).args([
        "export",
        "--output",
        target.to_str().expect("utf8 path"),
        "--json",
    ]));
    assert_eq!(report["exported"], 3);
    assert!(target.exists());
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[test]
fn summary_json_reports_posture_and_live_breakdown() {
    let dir = project_dir();
    let report = json_output(par_cmd(dir.path()).args(["summary", "--json"]));
    assert_eq!(report["records"], 3);
    assert_eq!(report["audit_readiness_percent"], 72);
    assert_eq!(report["status"]["open"], 1);
    assert_eq!(report["status"]["in_progress"], 1);
    assert_eq!(report["status"]["closed"], 1);
    assert_eq!(report["frameworks"][0]["framework"], "ISO/IEC 27001");
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn malformed_config_fails_with_a_pointer_to_the_file() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("parapet.toml"), "[service\nlatency_ms=").expect("write config");
    par_cmd(dir.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parapet.toml"));
}
