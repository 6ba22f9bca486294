//! End-to-end CLI tests: init a workspace, seed demo records, and walk
//! the audit, tracker, and recurrence-detection views.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rcaloop(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rcaloop").expect("binary builds");
    cmd.arg("--path").arg(dir.path());
    cmd.env_remove("RCALOOP_UPLOAD_PASSWORD");
    cmd
}

fn init_and_seed(dir: &TempDir) {
    rcaloop(dir).arg("init").assert().success();
    rcaloop(dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded"));
}

#[test]
fn init_refuses_double_initialization() {
    let dir = TempDir::new().unwrap();

    rcaloop(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    rcaloop(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    rcaloop(&dir).arg("init").arg("--force").assert().success();
}

#[test]
fn commands_require_initialized_workspace() {
    let dir = TempDir::new().unwrap();

    rcaloop(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn seed_then_audit_views() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    // Seeding again is a no-op
    rcaloop(&dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));

    rcaloop(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("RCA Audit (2 records)"))
        .stdout(predicate::str::contains("Gateway session outage"));

    rcaloop(&dir)
        .arg("list")
        .arg("--environment")
        .arg("Testing")
        .assert()
        .success()
        .stdout(predicate::str::contains("RCA Audit (1 records)"));

    rcaloop(&dir)
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Action Tracker"))
        .stdout(predicate::str::contains("[To Do]"));

    rcaloop(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("RCA records: 2 (2 open)"))
        .stdout(predicate::str::contains("Closure rate: 0%"));
}

#[test]
fn similar_ranks_seeded_records() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    let output = rcaloop(&dir)
        .arg("--format")
        .arg("json")
        .arg("similar")
        .arg("gateway session outage dynamic address flag")
        .output()
        .unwrap();
    assert!(output.status.success());

    let matches: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches[0]["title"]
        .as_str()
        .unwrap()
        .contains("Gateway session outage"));
    assert!(matches[0]["score"].as_f64().unwrap() >= matches[1]["score"].as_f64().unwrap());
}

#[test]
fn action_update_verify_and_evidence_flow() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    // Grab one action id from the JSON tracker view
    let output = rcaloop(&dir)
        .arg("--format")
        .arg("json")
        .arg("actions")
        .output()
        .unwrap();
    let actions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let action_id = actions[0]["action_id"].as_str().unwrap().to_string();

    rcaloop(&dir)
        .arg("update")
        .arg(&action_id)
        .arg("--status")
        .arg("done")
        .arg("--owner-person")
        .arg("J. Doe")
        .assert()
        .success();

    rcaloop(&dir)
        .arg("verify")
        .arg(&action_id)
        .arg("--by")
        .arg("QA team")
        .assert()
        .success();

    rcaloop(&dir)
        .arg("evidence")
        .arg(&action_id)
        .arg("--add")
        .arg("Change ticket closed")
        .arg("--url")
        .arg("https://tickets.example/42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Evidence"));

    rcaloop(&dir)
        .arg("evidence")
        .arg(&action_id)
        .assert()
        .success()
        .stdout(predicate::str::contains("Change ticket closed"));

    rcaloop(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: 1"))
        .stdout(predicate::str::contains("Verified: 1"));
}

#[test]
fn ingest_is_password_gated() {
    let dir = TempDir::new().unwrap();
    rcaloop(&dir).arg("init").assert().success();

    // Configure a shared secret
    let config_path = dir.path().join(".rcaloop").join("config.toml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    std::fs::write(
        &config_path,
        format!("{config}\nupload_password = \"s3cret\"\n"),
    )
    .unwrap();

    rcaloop(&dir)
        .arg("ingest")
        .arg("report.docx")
        .arg("--oem")
        .arg("Acme")
        .arg("--environment")
        .arg("UAT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Upload access denied"));

    // Wrong password also fails
    rcaloop(&dir)
        .arg("ingest")
        .arg("report.docx")
        .arg("--oem")
        .arg("Acme")
        .arg("--environment")
        .arg("UAT")
        .arg("--password")
        .arg("wrong")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Upload access denied"));

    // Right password clears the gate; failure is now about the missing file
    rcaloop(&dir)
        .arg("ingest")
        .arg("report.docx")
        .arg("--oem")
        .arg("Acme")
        .arg("--environment")
        .arg("UAT")
        .arg("--password")
        .arg("s3cret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target not found"));
}

#[test]
fn ingest_rejects_unknown_environment() {
    let dir = TempDir::new().unwrap();
    rcaloop(&dir).arg("init").assert().success();

    rcaloop(&dir)
        .arg("ingest")
        .arg("report.docx")
        .arg("--oem")
        .arg("Acme")
        .arg("--environment")
        .arg("Staging")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown environment"));
}
