//! # runcap Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the runcap CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration
//! - Routing execution to the appropriate command handler
//! - Turning errors into process exit codes
//!
//! ## Exit Codes
//!
//! runcap prints nothing on failure by default; the exit code is the report:
//! - the child's own status when it exits non-zero
//! - the OS error number when the child cannot be spawned
//! - `128 + n` when the child is killed by signal `n`
//! - `1` for everything else (sink, allocation, configuration, script errors)
//!
//! Running with `-v` logs the error chain to stderr.
//!
//! ## Examples
//!
//! ```bash
//! # Capture the default invocation (`ls` with an empty argv[0])
//! runcap
//!
//! # Capture any program
//! runcap run printf hello
//!
//! # Run a script with debug logging
//! runcap -vv script build.rc
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handles specific command logic (run, script)
mod common; // Shared utilities (process capture)
mod core; // Core infrastructure (errors, config)

use crate::core::{config, error};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "runcap",
    about = "Run a program and capture its standard output in memory",
    long_about = "Spawns a child process with stdout redirected into an anonymous in-memory file,\n\
                  waits for it, and prints what it wrote. Without a subcommand the configured\n\
                  default invocation is captured.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file only.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    #[command(alias = "s")]
    Script(commands::script::ScriptArgs),
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn dispatch(cli: Cli) -> error::Result<()> {
    let cfg = config::load_config(cli.config.as_deref())?;
    match cli.command {
        Some(Commands::Run(args)) => commands::run::handle_run(args, &cfg),
        Some(Commands::Script(args)) => commands::script::handle_script(args, &cfg),
        None => commands::run::handle_default(&cfg),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = dispatch(cli) {
        let code = error::exit_code_of(&e);
        info!("Command execution failed (exit code {}): {:#}", code, e);
        debug!("Error details: {:?}", e);
        std::process::exit(code);
    }
}
