//! Integration tests for `quay cmd` — layer resolution against real
//! directories, plus the swapped-argument retry reaching the handler.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quay(settings: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quay").expect("quay binary should exist");
    // Isolate each test from any real ~/.quay/settings.json.
    cmd.env("QUAY_SETTINGS", settings.path().join("settings.json"));
    cmd
}

fn layer_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for name in names {
        std::fs::write(dir.path().join(name), "services: {}\n").expect("write layer");
    }
    dir
}

fn standard_layers() -> TempDir {
    layer_dir(&[
        "compose.yml",
        "compose.a.yml",
        "compose.c.yml",
        "compose.x.a.b.yml",
    ])
}

#[test]
fn test_cmd_single_tag_selects_matching_simple_layer_only() {
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();
    let expected = format!(
        "docker compose -f {base} -f {a}",
        base = dir.path().join("compose.yml").display(),
        a = dir.path().join("compose.a.yml").display(),
    );

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .arg("a")
        .assert()
        .success()
        .stdout(format!("{expected}\n"));
}

#[test]
fn test_cmd_cross_layer_needs_every_tag() {
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .args(["a", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compose.x.a.b.yml"));

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .arg("b")
        .assert()
        .success()
        .stdout(predicate::str::contains("compose.x.a.b.yml").not());
}

#[test]
fn test_cmd_base_layer_always_comes_first() {
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();

    let output = quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .args(["a", "b", "c"])
        .output()
        .expect("run quay");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let base = dir.path().join("compose.yml").display().to_string();
    let first_flag = stdout.split(" -f ").nth(1).expect("at least one -f");
    assert!(
        first_flag.starts_with(&base),
        "base layer must be referenced first: {stdout}"
    );
}

#[test]
fn test_cmd_human_mode_prints_one_relative_layer_per_line() {
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .args(["-H", "a", "b"])
        .assert()
        .success()
        .stdout("compose.yml\ncompose.a.yml\ncompose.x.a.b.yml\n");
}

#[test]
fn test_cmd_wildcard_includes_simple_layers_but_not_cross() {
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .args(["-H", "*"])
        .assert()
        .success()
        .stdout("compose.yml\ncompose.a.yml\ncompose.c.yml\n");
}

#[test]
fn test_cmd_missing_dir_is_a_configuration_error() {
    let settings = TempDir::new().expect("tempdir");

    quay(&settings)
        .args(["cmd", "--dir", "/no/such/quay-stack", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not accessible"));
}

#[test]
fn test_cmd_uses_default_tags_from_settings_store() {
    let settings = TempDir::new().expect("tempdir");
    std::fs::write(
        settings.path().join("settings.json"),
        r#"{"compose.defaults": "c"}"#,
    )
    .expect("write settings");
    let dir = standard_layers();

    quay(&settings)
        .args(["cmd", "--dir"])
        .arg(dir.path())
        .args(["-H", "a"])
        .assert()
        .success()
        .stdout("compose.yml\ncompose.a.yml\ncompose.c.yml\n");
}

#[test]
fn test_swapped_argument_order_reaches_the_cmd_handler() {
    // `quay a cmd ...` is unrecognized; the single retry swaps the first
    // two positionals into `quay cmd a ...`, which resolves normally.
    let settings = TempDir::new().expect("tempdir");
    let dir = standard_layers();

    quay(&settings)
        .args(["a", "cmd", "--dir"])
        .arg(dir.path())
        .arg("-H")
        .assert()
        .success()
        .stdout("compose.yml\ncompose.a.yml\n");
}
