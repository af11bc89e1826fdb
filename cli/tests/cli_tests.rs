//! Integration tests for the quay CLI surface: help, version, and the
//! unrecognized-command fallback.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn quay() -> Command {
    Command::cargo_bin("quay").expect("quay binary should exist")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_nonzero() {
    // clap with arg_required_else_help prints help and reports a usage error
    quay()
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Layered compose orchestration for containerized service fleets",
        ));
}

#[test]
fn test_cli_help_flag_shows_help() {
    quay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    quay()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quay"));
}

#[test]
fn test_version_command_shows_version() {
    quay()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quay 0.3.0"));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_lists_core_commands() {
    quay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmd"))
        .stdout(predicate::str::contains("tunnel"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("up"));
}

// --- Unrecognized-command fallback ---

#[test]
fn test_unknown_command_falls_back_to_usage() {
    // One positional: no retry is possible, usage is printed, exit is 2.
    quay()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_unknown_command_in_both_orders_falls_back_to_usage() {
    // Both `frobnicate blargh` and the swapped `blargh frobnicate` miss;
    // the sentinel is suppressed and usage is shown instead.
    quay()
        .args(["frobnicate", "blargh"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_swapped_order_reaches_a_real_handler() {
    // `quay 0.3.0 version` is unrecognized; the retry swaps to
    // `version 0.3.0`, which parses (the extra positional is rejected by
    // clap with its own usage error, not the top-level fallback).
    quay()
        .args(["0.3.0", "version"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
}
