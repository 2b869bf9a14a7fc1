use assert_cmd::Command;
use predicates::prelude::*;

struct Env {
    dir: tempfile::TempDir,
}

impl Env {
    fn new() -> Self {
        let env = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        let data = env.dir.path().join("data");
        env.cmd()
            .args(["init", "--agent", "Acme Managing Agents", "--data-dir"])
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized takeon"));
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("takeon").unwrap();
        cmd.env("TAKEON_CONFIG_DIR", self.dir.path().join("config"))
            .env_remove("RUST_LOG");
        cmd
    }

    fn add_sunset(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "complex",
                "add",
                "Sunset Villas",
                "--type",
                "Body Corporate",
                "--take-on",
                "2024-03-15",
                "--year-end",
                "February",
                "--previous-agent-email",
                "records@oldtown.example",
            ])
            .assert()
    }
}

#[test]
fn test_periods_preview() {
    let env = Env::new();
    env.cmd()
        .args(["periods", "2024-03-15", "--year-end", "February Year End"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01 March 2023 to 29 February 2024"));
}

#[test]
fn test_periods_preview_with_bad_date_falls_back() {
    let env = Env::new();
    env.cmd()
        .args(["periods", "not-a-date"])
        .assert()
        .success()
        .stdout(predicate::str::contains("previous 5 financial years"));
}

#[test]
fn test_add_complex_seeds_and_rejects_duplicate() {
    let env = Env::new();
    env.add_sunset()
        .success()
        .stdout(predicate::str::contains("Added Sunset Villas (Body Corporate)"))
        .stdout(predicate::str::contains("Skipped"));
    env.add_sunset()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_receive_by_row_number() {
    let env = Env::new();
    env.add_sunset().success();
    env.cmd()
        .args(["checklist", "receive", "Sunset Villas", "1", "--date", "2024-03-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Received: Current financial year records"))
        .stdout(predicate::str::contains("2024-03-20"));
    env.cmd()
        .args(["checklist", "show", "Sunset Villas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of"));
}

#[test]
fn test_unknown_complex_fails() {
    let env = Env::new();
    env.cmd()
        .args(["checklist", "show", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown complex: Nowhere"));
}

#[test]
fn test_draft_handover_email() {
    let env = Env::new();
    env.add_sunset().success();
    env.cmd()
        .args(["draft", "handover", "Sunset Villas", "--mark-sent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To: records@oldtown.example"))
        .stdout(predicate::str::contains("Subject: Take-on of Sunset Villas: handover request"))
        .stdout(predicate::str::contains("Acme Managing Agents"));
    env.cmd()
        .args(["complex", "show", "Sunset Villas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Handover sent:     2"));
}

#[test]
fn test_export_status_pdf() {
    let env = Env::new();
    env.add_sunset().success();
    let out = env.dir.path().join("status.pdf");
    env.cmd()
        .args(["export", "status", "Sunset Villas", "--output"])
        .arg(&out)
        .assert()
        .success();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
