//! # runcap Script Runner
//!
//! File: cli/src/commands/script/runner.rs
//!
//! Executes parsed statements in order. Each statement is one
//! [`ProcessCapture::capture`] call; the first failing capture stops the
//! script and its error (with its exit code) is returned unchanged.
//!
use super::parser::{Destination, Statement};
use crate::common::process::{ChildInvocation, ProcessCapture};
use crate::core::error::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::io::Write;
use tracing::{debug, info};

/// Runs `statements`, writing `%` captures to `out`.
///
/// Statements are expected to have passed [`super::parser::validate`];
/// an unassigned variable is still reported as a script error.
pub fn run_statements<W: Write>(
    statements: &[Statement],
    capture: &ProcessCapture,
    out: &mut W,
) -> Result<()> {
    let mut vars: HashMap<String, String> = HashMap::new();
    for statement in statements {
        let program = statement
            .program
            .render(&vars)
            .map_err(|name| statement.error(format!("variable '{}' is not assigned", name)))?;
        let argv = statement
            .argv
            .iter()
            .map(|arg| arg.render(&vars))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|name| statement.error(format!("variable '{}' is not assigned", name)))?;

        debug!("{}:{}: running '{}'", statement.file, statement.line, program);
        let invocation = ChildInvocation::with_argv(program, argv);
        let output = capture
            .capture(&invocation)
            .with_context(|| format!("{}:{}: capture failed", statement.file, statement.line))?;

        match &statement.dest {
            Destination::Stdout => {
                out.write_all(&output)
                    .and_then(|()| out.write_all(b"\n"))
                    .and_then(|()| out.flush())
                    .context("Failed to write captured output")?;
            }
            Destination::Variable(name) => {
                info!(
                    "{}:{}: stored {} bytes in '{}'",
                    statement.file,
                    statement.line,
                    output.len(),
                    name
                );
                vars.insert(name.clone(), String::from_utf8_lossy(&output).into_owned());
            }
        }
    }
    Ok(())
}
