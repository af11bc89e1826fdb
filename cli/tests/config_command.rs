//! Integration tests for `quay config` — the settings store verbs.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quay(settings: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quay").expect("quay binary should exist");
    cmd.env("QUAY_SETTINGS", settings.path().join("settings.json"));
    cmd
}

#[test]
fn test_config_get_of_unset_key_prints_nothing() {
    let settings = TempDir::new().expect("tempdir");
    quay(&settings)
        .args(["config", "get", "compose.defaults"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_config_set_then_get_roundtrips() {
    let settings = TempDir::new().expect("tempdir");
    quay(&settings)
        .args(["--quiet", "config", "set", "services.webui.port", "8080"])
        .assert()
        .success();
    quay(&settings)
        .args(["config", "get", "services.webui.port"])
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn test_config_set_reports_the_new_value() {
    let settings = TempDir::new().expect("tempdir");
    quay(&settings)
        .args(["config", "set", "tunnel.network", "edge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set tunnel.network = edge"));
}

#[test]
fn test_config_list_prints_one_item_per_line_in_order() {
    let settings = TempDir::new().expect("tempdir");
    quay(&settings)
        .args(["--quiet", "config", "set", "compose.defaults", "webui;ollama;searxng"])
        .assert()
        .success();
    quay(&settings)
        .args(["config", "list", "compose.defaults"])
        .assert()
        .success()
        .stdout("webui\nollama\nsearxng\n");
}

#[test]
fn test_config_list_of_unset_key_is_empty() {
    let settings = TempDir::new().expect("tempdir");
    quay(&settings)
        .args(["config", "list", "compose.defaults"])
        .assert()
        .success()
        .stdout("");
}
