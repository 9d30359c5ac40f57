use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("signet")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("signet")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_login_requires_username() {
    cargo_bin_cmd!("signet")
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--username"));
}

#[test]
fn test_interactive_screen_needs_a_terminal() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("signet")
        .env("SIGNET_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
