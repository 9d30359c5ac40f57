use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn signet(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("signet");
    cmd.env("SIGNET_HOME", home).env_remove("SIGNET_LOG");
    cmd
}

fn register(home: &Path, username: &str, password: &str) -> assert_cmd::assert::Assert {
    signet(home)
        .args(["register", "--username", username])
        .write_stdin(format!("{password}\n"))
        .assert()
}

fn login(home: &Path, username: &str, password: &str) -> assert_cmd::assert::Assert {
    signet(home)
        .args(["login", "--username", username])
        .write_stdin(format!("{password}\n"))
        .assert()
}

fn status(home: &Path) -> assert_cmd::assert::Assert {
    signet(home).arg("status").assert().success()
}

#[test]
fn test_fresh_home_is_logged_out() {
    let dir = tempdir().unwrap();

    status(dir.path()).stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_register_then_login_persists_session() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "pw1")
        .success()
        .stdout(predicate::str::contains("Registration successful"));
    status(dir.path()).stdout(predicate::str::contains("Logged out"));

    login(dir.path(), "alice", "pw1")
        .success()
        .stdout(predicate::str::contains("Logged in successfully"));
    status(dir.path()).stdout(predicate::str::contains("Logged in"));

    let flag = fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(flag.contains("isLoggedIn"));
    assert!(flag.contains("true"));
}

#[test]
fn test_logout_clears_session() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "pw1").success();
    login(dir.path(), "alice", "pw1").success();

    signet(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    status(dir.path()).stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_logout_when_logged_out_succeeds() {
    let dir = tempdir().unwrap();

    signet(dir.path()).arg("logout").assert().success();
    status(dir.path()).stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let dir = tempdir().unwrap();

    register(dir.path(), "bob", "x").success();
    register(dir.path(), "bob", "y")
        .failure()
        .stderr(predicate::str::contains("Username 'bob' already exists"));

    // The original password still works.
    login(dir.path(), "bob", "x").success();
}

#[test]
fn test_wrong_password_is_rejected() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "pw1").success();
    login(dir.path(), "alice", "nope")
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
    status(dir.path()).stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_unknown_user_is_rejected() {
    let dir = tempdir().unwrap();

    login(dir.path(), "ghost", "pw")
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
}

#[test]
fn test_empty_password_fails_validation() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "")
        .failure()
        .stderr(predicate::str::contains("Please fill up the required fields"));
    login(dir.path(), "alice", "")
        .failure()
        .stderr(predicate::str::contains("Please fill up the required fields"));
}

#[test]
fn test_empty_username_fails_validation() {
    let dir = tempdir().unwrap();

    register(dir.path(), "", "pw")
        .failure()
        .stderr(predicate::str::contains("Please fill up the required fields"));
}

#[test]
fn test_whitespace_password_is_accepted() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", " ").success();
    login(dir.path(), "alice", " ").success();
}

#[test]
fn test_log_file_is_written() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "pw1").success();

    assert!(dir.path().join("logs").join("signet.log").exists());
}

#[test]
fn test_logout_works_when_database_is_unusable() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("signet.db")).unwrap();
    fs::write(dir.path().join("session.json"), r#"{"isLoggedIn":"true"}"#).unwrap();

    signet(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    status(dir.path()).stdout(predicate::str::contains("Logged out"));
}

#[test]
fn test_unusable_database_is_reported_on_login() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("signet.db")).unwrap();

    login(dir.path(), "alice", "pw1")
        .failure()
        .stderr(predicate::str::contains("Failed to open user database"));
}

#[test]
fn test_login_recovers_from_corrupt_session_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("session.json"), r#"{"isLoggedIn": "tr"#).unwrap();

    register(dir.path(), "alice", "pw1").success();
    login(dir.path(), "alice", "pw1")
        .success()
        .stdout(predicate::str::contains("Logged in successfully"));
    status(dir.path()).stdout(predicate::str::contains("Logged in"));
}

#[test]
fn test_register_while_logged_in_is_rejected() {
    let dir = tempdir().unwrap();

    register(dir.path(), "alice", "pw1").success();
    login(dir.path(), "alice", "pw1").success();

    register(dir.path(), "bob", "pw2")
        .failure()
        .stderr(predicate::str::contains("Already logged in"));
    status(dir.path()).stdout(predicate::str::contains("Logged in"));
}

#[test]
fn test_unwritable_log_file_does_not_abort() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("logs").join("signet.log")).unwrap();

    signet(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"))
        .stderr(predicate::str::contains("logging disabled"));
}
