//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text.

#![allow(deprecated)] // cargo_bin deprecation; replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `pagesync` binary.
fn pagesync() -> Command {
    Command::cargo_bin("pagesync").expect("binary 'pagesync' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    pagesync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: pagesync"))
        .stdout(predicate::str::contains("pages"))
        .stdout(predicate::str::contains("to-document"))
        .stdout(predicate::str::contains("to-canvas"))
        .stdout(predicate::str::contains("source"))
        .stdout(predicate::str::contains("locate"));
}

#[test]
fn version_flag_shows_semver() {
    pagesync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^pagesync \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    pagesync()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: pagesync"))
        .stdout(predicate::str::contains("PAGESYNC_RESULT: "))
        .stdout(predicate::str::contains(r#""kind":"usage""#));
}

#[test]
fn invalid_subcommand_fails() {
    pagesync()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn source_help() {
    pagesync()
        .args(["source", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--page"))
        .stdout(predicate::str::contains("--document"))
        .stdout(predicate::str::contains("--synctex"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn locate_help() {
    pagesync()
        .args(["locate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--column"))
        .stdout(predicate::str::contains("--document"));
}

#[test]
fn source_requires_document() {
    pagesync()
        .args(["source", "1", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--document"))
        .stdout(predicate::str::is_match(r#"PAGESYNC_RESULT: \{.*"kind":"usage".*\}\n$"#).unwrap());
}

#[test]
fn global_layout_flags_are_listed() {
    pagesync()
        .args(["pages", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pages-dir"))
        .stdout(predicate::str::contains("--target-width"))
        .stdout(predicate::str::contains("--spacing"));
}
