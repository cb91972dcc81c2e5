//! # runcap Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command modules. Keeping them under
//! `common::` separates reusable machinery from command-specific logic
//! (`commands::`) and core infrastructure (`core::`).
//!
//! - **`process`**: Runs a child process with its stdout redirected into an
//!   anonymous in-memory file and returns the captured bytes.
//!

/// Spawn-and-capture of a child's standard output.
pub mod process;
