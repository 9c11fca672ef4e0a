//! Command-line tests

mod common;

use assert_cmd::Command;
use common::create_test_config;
use predicates::prelude::*;

const PROJECT: &str = r#"
name: cli-demo
default: build
targets:
  build:
    description: Compile everything
    depends: [init]
    tasks:
      - echo: "building ${mode}"
  init:
    tasks:
      - echo: "init"
  broken:
    tasks:
      - fail: "deliberate failure"
properties:
  - name: mode
    value: debug
"#;

fn brisk() -> Command {
    let mut cmd = Command::cargo_bin("brisk").unwrap();
    cmd.arg("--no-global")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn test_runs_default_target() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[echo] init"))
        .stdout(predicate::str::contains("[echo] building debug"))
        .stdout(predicate::str::contains("BUILD SUCCEEDED"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_logs_build_progress() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting build"));
}

#[test]
fn test_define_overrides_build_file() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .args(["-D", "mode=release", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("building release"));
}

#[test]
fn test_explicit_file_and_parallel() {
    let (temp, path) = create_test_config(PROJECT);

    brisk()
        .current_dir(std::env::temp_dir())
        .arg("-f")
        .arg(&path)
        .args(["-p", "-j", "2", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BUILD SUCCEEDED"));
    drop(temp);
}

#[test]
fn test_list_targets() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cli-demo"))
        .stdout(predicate::str::contains("Compile everything"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("BUILD").not());
}

#[test]
fn test_failure_exits_non_zero() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .arg("broken")
        .assert()
        .failure()
        .stdout(predicate::str::contains("BUILD FAILED"))
        .stderr(predicate::str::contains("deliberate failure"));
}

#[test]
fn test_unknown_target_exits_non_zero() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent"));
}

#[test]
fn test_silent_prints_nothing_on_success() {
    let (temp, _path) = create_test_config(PROJECT);

    brisk()
        .current_dir(temp.path())
        .arg("-s")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_completions() {
    brisk()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brisk"));
}
