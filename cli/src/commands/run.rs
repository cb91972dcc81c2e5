//! # runcap Run Command Handler
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! This module implements the two commands that perform a single capture:
//!
//! - `runcap run <PROGRAM> [ARGS]...` captures an arbitrary program.
//! - `runcap` with no subcommand captures the configured default invocation,
//!   which out of the box is `ls` with the argument vector `[""]` (an empty
//!   `argv[0]` and no further arguments).
//!
//! Both write the captured bytes followed by a newline to stdout. Failures are
//! returned to `main`, which exits with the error's exit code.
//!
//! ## Usage
//!
//! ```bash
//! runcap                       # list the current directory
//! runcap run printf hello      # prints "hello\n"
//! runcap run sh -c 'exit 2'    # prints nothing, exits 2
//! runcap run --arg0 renamed cat /proc/self/cmdline
//! ```
//!
use crate::common::process::{ChildInvocation, ProcessCapture};
use crate::core::{config::Config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing::{debug, info};

/// # Run Arguments (`RunArgs`)
///
/// Defines the command-line arguments accepted by the `runcap run` subcommand.
#[derive(Parser, Debug)]
#[command(
    about = "Run a program and print its captured standard output",
    long_about = "Spawns PROGRAM (resolved through PATH) with ARGS, captures everything it writes to \
                  stdout in an anonymous in-memory file, and prints it followed by a newline. \
                  A non-zero exit of PROGRAM becomes runcap's exit code."
)]
pub struct RunArgs {
    /// Optional: Value passed as the child's `argv[0]` instead of PROGRAM.
    #[arg(long, value_name = "NAME")]
    arg0: Option<String>,

    /// The program to run.
    program: String,

    /// Arguments passed after `argv[0]`. Values starting with `-` are passed through.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl RunArgs {
    fn invocation(&self) -> ChildInvocation {
        let arg0 = self.arg0.clone().unwrap_or_else(|| self.program.clone());
        ChildInvocation::with_argv(
            self.program.clone(),
            std::iter::once(arg0).chain(self.args.iter().cloned()),
        )
    }
}

/// # Handle Run Command (`handle_run`)
///
/// Captures the program named in `args` and prints the result.
pub fn handle_run(args: RunArgs, cfg: &Config) -> Result<()> {
    info!("Handling run command...");
    debug!("Run args: {:?}", args);
    capture_and_print(&args.invocation(), cfg)
}

/// # Handle Default Invocation (`handle_default`)
///
/// Captures `cfg.default_invocation` and prints the result. Used when runcap
/// is started without a subcommand.
pub fn handle_default(cfg: &Config) -> Result<()> {
    info!("No subcommand given, running the default invocation...");
    let invocation = ChildInvocation::with_argv(
        cfg.default_invocation.program.clone(),
        cfg.default_invocation.argv.iter().cloned(),
    );
    capture_and_print(&invocation, cfg)
}

fn capture_and_print(invocation: &ChildInvocation, cfg: &Config) -> Result<()> {
    let capture = ProcessCapture::new(&cfg.capture.sink_name)?;
    let output = capture
        .capture(invocation)
        .with_context(|| format!("Capture of '{}' failed", invocation.program))?;
    let stdout = std::io::stdout();
    write_capture(&mut stdout.lock(), &output)
}

/// Writes `output` and a trailing newline, then flushes.
fn write_capture<W: Write>(out: &mut W, output: &[u8]) -> Result<()> {
    out.write_all(output)
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush())
        .context("Failed to write captured output to stdout")
}
