//! # runcap CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`run.rs`, `script.rs`, ...).
//! Each `.rs` file in `cli/tests/` is compiled as a separate test crate that
//! drives the compiled `runcap` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get runcap Command (`runcap_cmd`)
///
/// Creates an `assert_cmd::Command` pointing at the compiled `runcap` binary.
///
/// ## Panics
/// Panics if the `runcap` binary cannot be found via `Command::cargo_bin`.
pub fn runcap_cmd() -> Command {
    Command::cargo_bin("runcap").expect("Failed to find runcap binary for testing")
}

/// # Get Isolated runcap Command (`isolated_cmd`)
///
/// Like `runcap_cmd`, but runs inside `dir` with the user configuration
/// directory redirected into it, so no real `config.toml` or `.runcap.toml`
/// can leak into the test. A `.git` directory is created in `dir` to stop the
/// project configuration search there.
pub fn isolated_cmd(dir: &Path) -> Command {
    std::fs::create_dir_all(dir.join(".git")).expect("Failed to create .git marker");
    let mut cmd = runcap_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}
