//! # runcap Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the commands that make up the runcap CLI and makes
//! them accessible to the main application entry point (`main.rs`).
//!
//! ## Commands
//!
//! - `run`: Capture a single program (also hosts the no-subcommand default)
//! - `script`: Parse and execute runcap scripts, one capture per statement
//!
//! Each command defines its own arguments structure and handler function.
//!

/// Single-capture commands: `runcap run` and the default invocation.
pub mod run;
/// Script command: `DEST = PROGRAM(ARGS)` statements executed in order.
pub mod script;
