//! End-to-end tests for the `digest` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A `digest` command isolated from user configuration and environment.
fn digest(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("digest").unwrap();
    cmd.env_clear()
        .env("HOME", config_dir.path())
        .env("XDG_CONFIG_HOME", config_dir.path())
        .current_dir(config_dir.path());
    cmd
}

#[test]
fn test_decode_from_stdin() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .args(["decode", "git_status"])
        .write_stdin("## main\nAA both-added.ts\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("git status ok: main, 1 conflict"))
        .stdout(predicate::str::contains("both-added.ts"));
}

#[test]
fn test_decode_json_from_file() {
    let home = tempfile::tempdir().unwrap();
    let output = digest(&home)
        .args(["decode", "lint:eslint", "--format", "json", "--exit-code", "1", "--input"])
        .arg(fixture_path("eslint.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "lint");
    assert_eq!(json["source"], "eslint");
    assert_eq!(json["success"], false);
    assert_eq!(json["summary"]["errors"], 1);
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_decode_full_payload() {
    let home = tempfile::tempdir().unwrap();
    let output = digest(&home)
        .args(["decode", "test_run", "--full", "--format", "both", "--input"])
        .arg(fixture_path("jest_failing.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["operation"], "test_run");
    assert_eq!(payload["representation"], "full");
    assert_eq!(payload["structured"]["summary"]["total"], 5);
    assert!(payload["text"].as_str().unwrap().starts_with("tests ok:"));
}

#[test]
fn test_decode_with_stderr_file() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .args(["decode", "compose", "--exit-code", "1", "--stderr"])
        .arg(fixture_path("compose_up_failed.txt"))
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("compose failed:"))
        .stdout(predicate::str::contains("port is already allocated"));
}

#[test]
fn test_unknown_operation_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .args(["decode", "git_blame"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("git_blame"));
}

#[test]
fn test_missing_input_file() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .args(["decode", "git_diff", "--input", "does-not-exist.txt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_operations_listing() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .arg("operations")
        .assert()
        .success()
        .stdout(predicate::str::contains("git_status"))
        .stdout(predicate::str::contains("lint:shellcheck"))
        .stdout(predicate::str::contains("coverage"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("digest.toml");

    digest(&home)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    digest(&home)
        .args(["config", "show", "--max-ratio", "0.5", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("max_ratio = 0.5"))
        .stdout(predicate::str::contains("coverage_floor = 80.0"));
}

#[test]
fn test_broken_global_config_rejected() {
    let home = tempfile::tempdir().unwrap();
    let global = home.path().join("tool-digest");
    std::fs::create_dir_all(&global).unwrap();
    std::fs::write(global.join("config.toml"), "[compact]\ncoverage_floor = 300.0\n").unwrap();

    digest(&home)
        .args(["decode", "git_diff"])
        .write_stdin("")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("coverage_floor"));
}

#[test]
fn test_out_of_range_flag_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    digest(&home)
        .args(["decode", "git_diff", "--max-ratio=-0.5"])
        .write_stdin("")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("--max-ratio"));
}

#[test]
fn test_invalid_config_rejected() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("bad.toml");
    std::fs::write(&path, "[selector]\nmax_ratio = \"lots\"\n").unwrap();

    digest(&home)
        .args(["decode", "git_diff", "--config"])
        .arg(&path)
        .write_stdin("")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid configuration"));
}
