//! Smoke tests for the CLI surface
//!
//! The bootstrap flow itself is interactive and talks to external CLIs, so
//! these stay at the argument-parsing boundary: help, version, flag
//! validation, and the failure path when stdin is closed immediately.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn smoke_help() {
    let mut cmd = Command::cargo_bin("pocketrocket").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operator bootstrap CLI"))
        .stdout(predicate::str::contains("--pulumi-path"))
        .stdout(predicate::str::contains("--aws-path"));
}

#[test]
fn smoke_version() {
    let mut cmd = Command::cargo_bin("pocketrocket").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pocketrocket"));
}

#[test]
fn smoke_unknown_flag_fails() {
    let mut cmd = Command::cargo_bin("pocketrocket").unwrap();
    cmd.arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn smoke_closed_stdin_fails_before_any_tool_call() {
    // With stdin closed the first prompt fails; pointing the tool paths at
    // a nonexistent binary guarantees nothing external could run anyway.
    let mut cmd = Command::cargo_bin("pocketrocket").unwrap();
    cmd.args([
        "--aws-path",
        "/nonexistent/aws",
        "--pulumi-path",
        "/nonexistent/pulumi",
    ])
    .write_stdin("")
    .assert()
    .failure();
}
