//! # runcap CLI Run Integration Tests
//!
//! File: cli/tests/run.rs
//!
//! ## Overview
//!
//! Integration tests for `runcap run`: captured output, the trailing newline,
//! and exit-code propagation for every failure path.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

/// # Test Run Hello (`test_run_hello`)
///
/// `printf hello` writes 5 bytes; runcap prints them followed by a newline.
#[test]
fn test_run_hello() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "printf", "hello"])
        .assert()
        .success()
        .stdout("hello\n");
}

/// # Test Run Keeps Child Newline (`test_run_keeps_child_newline`)
#[test]
fn test_run_keeps_child_newline() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "echo", "hello"])
        .assert()
        .success()
        .stdout("hello\n\n");
}

/// # Test Run Child Exit Code (`test_run_child_exit_code`)
///
/// A child exiting 2 with no output makes runcap exit 2 and print nothing.
#[test]
fn test_run_child_exit_code() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "sh", "-c", "exit 2"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

/// # Test Run Discards Output Of Failing Child (`test_run_discards_output_of_failing_child`)
#[test]
fn test_run_discards_output_of_failing_child() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "sh", "-c", "printf partial; exit 5"])
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty());
}

/// # Test Run Missing Program (`test_run_missing_program`)
///
/// Spawn failures exit with the OS error number (ENOENT is 2).
#[test]
fn test_run_missing_program() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "runcap-test-no-such-program"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

/// # Test Run Signal Death (`test_run_signal_death`)
#[test]
fn test_run_signal_death() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "sh", "-c", "kill -TERM $$"])
        .assert()
        .code(128 + 15)
        .stdout(predicate::str::is_empty());
}

/// # Test Run Verbose Logs Failure (`test_run_verbose_logs_failure`)
///
/// Failures are silent by default but logged to stderr with `-v`.
#[test]
fn test_run_verbose_logs_failure() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["-v", "run", "sh", "-c", "exit 3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("exited with status 3"));
}

/// # Test Run Arg0 Override (`test_run_arg0_override`)
#[test]
fn test_run_arg0_override() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["run", "--arg0", "renamed", "cat", "/proc/self/cmdline"])
        .assert()
        .success()
        .stdout("renamed\0/proc/self/cmdline\0\n");
}

/// # Test Run Inherits Environment (`test_run_inherits_environment`)
#[test]
fn test_run_inherits_environment() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .env("RUNCAP_IT_VALUE", "passed-through")
        .args(["run", "sh", "-c", "printf %s \"$RUNCAP_IT_VALUE\""])
        .assert()
        .success()
        .stdout("passed-through\n");
}

/// # Test Run Requires Program (`test_run_requires_program`)
#[test]
fn test_run_requires_program() {
    runcap_cmd()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROGRAM"));
}
