//! # runcap Script Command Handler
//!
//! File: cli/src/commands/script/mod.rs
//!
//! ## Overview
//!
//! This module implements the `runcap script` subcommand. A runcap script is a
//! list of `DEST = PROGRAM(ARGS)` statements, each of which runs one program
//! and captures its stdout; see [`parser`] for the syntax.
//!
//! ## Architecture
//!
//! 1. Read every file given on the command line, in order.
//! 2. Parse each file with `parser::parse_script` and concatenate the statements,
//!    so several files behave like one program (variables carry across files).
//! 3. Validate the combined program with `parser::validate`. Nothing runs if
//!    a variable is referenced before it is assigned.
//! 4. Execute with `runner::run_statements`, printing `%` captures to stdout.
//!
//! ## Usage
//!
//! ```bash
//! runcap script build.rc
//! runcap script prelude.rc main.rc
//! ```
//!
pub mod parser;
pub mod runner;

use crate::common::process::ProcessCapture;
use crate::core::{config::Config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Script Arguments (`ScriptArgs`)
///
/// Defines the command-line arguments accepted by the `runcap script` subcommand.
#[derive(Parser, Debug)]
#[command(
    about = "Run one or more runcap scripts",
    long_about = "Executes `DEST = PROGRAM(ARGS)` statements in order. `%` prints a capture; \
                  any other destination stores it for `{name}` substitution."
)]
pub struct ScriptArgs {
    /// Script files, executed in the order given as a single program.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// # Handle Script Command (`handle_script`)
///
/// Loads, parses and validates every script, then runs the combined
/// statements against a capturer configured from `cfg`.
///
/// ## Returns
///
/// * `Err` if a file cannot be read, a script fails to parse or validate, or a
///   capture fails. A failing capture keeps its own exit code.
pub fn handle_script(args: ScriptArgs, cfg: &Config) -> Result<()> {
    info!("Handling script command...");
    debug!("Script args: {:?}", args);

    let mut statements = Vec::new();
    for path in &args.files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        let parsed = parser::parse_script(&path.display().to_string(), &source)?;
        debug!("Parsed {} statements from {}", parsed.len(), path.display());
        statements.extend(parsed);
    }
    parser::validate(&statements)?;

    let capture = ProcessCapture::new(&cfg.capture.sink_name)?;
    let stdout = std::io::stdout();
    runner::run_statements(&statements, &capture, &mut stdout.lock())
}
