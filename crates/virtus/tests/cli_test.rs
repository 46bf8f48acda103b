//! Integration tests for the `virtus` CLI binary.
//!
//! These tests validate argument parsing, help output, shell
//! completions, and configuration error handling -- all without
//! requiring the Enki cloud.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `virtus` binary with env isolation.
///
/// Clears all `VIRTUS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn virtus_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("virtus");
    cmd.env("HOME", "/tmp/virtus-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/virtus-cli-test-nonexistent")
        .env_remove("VIRTUS_USERNAME")
        .env_remove("VIRTUS_PASSWORD")
        .env_remove("VIRTUS_HOME_ID")
        .env_remove("VIRTUS_NODE_ID")
        .env_remove("VIRTUS_OUTPUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = virtus_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    virtus_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Virtus air conditioners")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("discover"))
            .and(predicate::str::contains("swing")),
    );
}

#[test]
fn test_version_flag() {
    virtus_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("virtus"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    virtus_cmd().arg("defrost-now").assert().failure();
}

#[test]
fn test_mode_rejects_unknown_value() {
    let output = virtus_cmd().args(["mode", "turbo"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("turbo"), "output:\n{text}");
}

#[test]
fn test_swing_set_rejects_bad_position() {
    let output = virtus_cmd()
        .args(["swing", "set", "vertical", "9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration handling ──────────────────────────────────────────

#[test]
fn test_status_without_config_is_usage_error() {
    let output = virtus_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("config init") || text.contains("No device"),
        "output:\n{text}"
    );
}

#[test]
fn test_config_path_prints_a_path() {
    virtus_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Completions ─────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    virtus_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("virtus"));
}
