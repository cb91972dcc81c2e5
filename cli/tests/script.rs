//! # runcap CLI Script Integration Tests
//!
//! File: cli/tests/script.rs
//!
//! ## Overview
//!
//! Integration tests for `runcap script`: printing, variables across files,
//! parse and validation errors, and failure propagation.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// # Test Script Prints Statements (`test_script_prints_statements`)
#[test]
fn test_script_prints_statements() {
    let temp_dir = tempdir().unwrap();
    let script = write_script(
        temp_dir.path(),
        "hello.rc",
        "# greet twice\n% = printf(printf, hello)\n% = printf(printf, again)\n",
    );

    isolated_cmd(temp_dir.path())
        .arg("script")
        .arg(&script)
        .assert()
        .success()
        .stdout("hello\nagain\n");
}

/// # Test Script Default Invocation (`test_script_default_invocation`)
///
/// `% = ls()` is the same invocation as running runcap without a subcommand.
#[test]
fn test_script_default_invocation() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("listed"), "").unwrap();
    let script = write_script(temp_dir.path(), "ls.rc", "% = ls()\n");

    isolated_cmd(temp_dir.path())
        .env("LC_ALL", "C")
        .arg("script")
        .arg(&script)
        .assert()
        .success()
        .stdout("listed\nls.rc\n\n");
}

/// # Test Script Variables Across Files (`test_script_variables_across_files`)
#[test]
fn test_script_variables_across_files() {
    let temp_dir = tempdir().unwrap();
    let prelude = write_script(temp_dir.path(), "prelude.rc", "who = printf(printf, world)\n");
    let main = write_script(
        temp_dir.path(),
        "main.rc",
        "% = printf(printf, hello-{who})\n",
    );

    isolated_cmd(temp_dir.path())
        .arg("script")
        .arg(&prelude)
        .arg(&main)
        .assert()
        .success()
        .stdout("hello-world\n");
}

/// # Test Script Parse Error Runs Nothing (`test_script_parse_error_runs_nothing`)
#[test]
fn test_script_parse_error_runs_nothing() {
    let temp_dir = tempdir().unwrap();
    let script = write_script(
        temp_dir.path(),
        "broken.rc",
        "% = printf(printf, first)\n% = printf(printf, oops\n",
    );

    isolated_cmd(temp_dir.path())
        .arg("-v")
        .arg("script")
        .arg(&script)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("broken.rc:2"));
}

/// # Test Script Use Before Assignment (`test_script_use_before_assignment`)
#[test]
fn test_script_use_before_assignment() {
    let temp_dir = tempdir().unwrap();
    let script = write_script(
        temp_dir.path(),
        "order.rc",
        "% = printf(printf, {later})\nlater = printf(printf, x)\n",
    );

    isolated_cmd(temp_dir.path())
        .arg("script")
        .arg(&script)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

/// # Test Script Failure Keeps Earlier Output (`test_script_failure_keeps_earlier_output`)
#[test]
fn test_script_failure_keeps_earlier_output() {
    let temp_dir = tempdir().unwrap();
    let script = write_script(
        temp_dir.path(),
        "fail.rc",
        "% = printf(printf, before)\n% = sh(sh, -c, exit 6)\n% = printf(printf, after)\n",
    );

    isolated_cmd(temp_dir.path())
        .arg("script")
        .arg(&script)
        .assert()
        .code(6)
        .stdout("before\n");
}

/// # Test Script Missing File (`test_script_missing_file`)
#[test]
fn test_script_missing_file() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["script", "does-not-exist.rc"])
        .assert()
        .code(1);
}
