//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn teller(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("teller").unwrap();
    cmd.env("TELLER_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn with_accounts() -> TempDir {
    let dir = TempDir::new().unwrap();
    teller(&dir).arg("init").assert().success();
    teller(&dir)
        .args(["account", "create", "alice", "--balance", "100"])
        .assert()
        .success();
    teller(&dir)
        .args(["account", "create", "bob"])
        .assert()
        .success();
    dir
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    teller(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deposit"))
        .stdout(predicate::str::contains("transfer"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn init_with_demo_account() {
    let dir = TempDir::new().unwrap();
    teller(&dir)
        .args(["init", "--demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings to:"))
        .stdout(predicate::str::contains("Created demo account demo_user"));

    assert!(dir.path().join("config.json").exists());

    // Seeding twice does not duplicate the account or rewrite settings
    teller(&dir)
        .args(["init", "--demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings").not())
        .stdout(predicate::str::contains("Created demo account").not());
    teller(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo_user"))
        .stdout(predicate::str::contains("1 account(s)"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    teller(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("ledger.db"))
        .stdout(predicate::str::contains("History limit"));
}

#[test]
fn create_and_list_accounts() {
    let dir = with_accounts();
    teller(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob"))
        .stdout(predicate::str::contains("total $100.00"));
}

#[test]
fn duplicate_account_fails() {
    let dir = with_accounts();
    teller(&dir)
        .args(["account", "create", "ALICE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn deposit_withdraw_and_balance() {
    let dir = with_accounts();
    teller(&dir)
        .args(["deposit", "bob", "25.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New balance: $25.50"));

    teller(&dir)
        .args(["withdraw", "bob", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New balance: $20.50"));

    teller(&dir)
        .args(["balance", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob: $20.50"));
}

#[test]
fn overdraw_fails_and_changes_nothing() {
    let dir = with_accounts();
    teller(&dir)
        .args(["withdraw", "alice", "1000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));

    teller(&dir)
        .args(["balance", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice: $100.00"));
}

#[test]
fn invalid_amount_is_rejected() {
    let dir = with_accounts();
    teller(&dir)
        .args(["deposit", "alice", "12.345"])
        .assert()
        .failure();
    teller(&dir).args(["deposit", "alice", "0"]).assert().failure();
}

#[test]
fn transfer_and_history() {
    let dir = with_accounts();
    teller(&dir)
        .args(["transfer", "alice", "bob", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferred $40.00 from alice to bob"));

    teller(&dir)
        .args(["history", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("transfer_out"))
        .stdout(predicate::str::contains("-$40.00"));

    teller(&dir)
        .args(["history", "bob", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("transfer_in"));

    teller(&dir)
        .args(["account", "verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob"));
}

#[test]
fn self_transfer_fails() {
    let dir = with_accounts();
    teller(&dir)
        .args(["transfer", "alice", "alice", "1"])
        .assert()
        .failure();
}

#[test]
fn export_csv_to_file() {
    let dir = with_accounts();
    teller(&dir).args(["deposit", "bob", "10"]).assert().success();

    let out = dir.path().join("bob.csv");
    teller(&dir)
        .args(["export", "bob", "--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 transactions"));

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.lines().count() >= 2);
    assert!(contents.contains("deposit"));
}

#[test]
fn export_json_to_stdout() {
    let dir = with_accounts();
    teller(&dir)
        .args(["export", "alice", "--format", "json", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"alice\""));
}

#[test]
fn exec_json_requests() {
    let dir = with_accounts();
    teller(&dir)
        .args([
            "exec",
            r#"{"operation":"deposit","accountRef":"bob","amount":"12.00"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\":true"))
        .stdout(predicate::str::contains("12.00"));

    teller(&dir)
        .arg("exec")
        .write_stdin(r#"{"operation":"getBalance","accountRef":"bob"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\":true"));
}

#[test]
fn exec_failure_reports_error_kind() {
    let dir = with_accounts();
    teller(&dir)
        .args([
            "exec",
            r#"{"operation":"withdrawal","accountRef":"alice","amount":"1000"}"#,
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"ok\":false"))
        .stdout(predicate::str::contains("insufficient_funds"));
}

#[test]
fn conversation_log_and_list() {
    let dir = with_accounts();
    teller(&dir)
        .args([
            "conversation",
            "log",
            "what is my balance",
            "alice has $100.00",
            "--intent",
            "get_balance",
            "--account",
            "alice",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded conversation entry"));

    teller(&dir)
        .args(["conversation", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("what is my balance"));
}
