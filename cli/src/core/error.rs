//! # runcap Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout runcap. Every failure
//! a capture can hit maps to exactly one process exit code, so the error type
//! is also where that mapping lives.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `RuncapError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover these domains:
//! - Output sink creation and I/O
//! - Spawning and waiting for the child
//! - Child exit status (non-zero exit, signal death)
//! - Buffer allocation
//! - Configuration and script errors
//!
//! ## Examples
//!
//! ```rust
//! // Raise a specific error type
//! anyhow::bail!(RuncapError::ChildExit { program: "ls".into(), code: 2 });
//!
//! // Recover the exit code at the top level
//! let code = e
//!     .chain()
//!     .find_map(|cause| cause.downcast_ref::<RuncapError>())
//!     .map_or(1, RuncapError::exit_code);
//! ```
//!
use thiserror::Error;

/// Exit code used for every failure that has no more specific code.
pub const GENERIC_FAILURE: i32 = 1;

/// Custom error type for the runcap application.
#[derive(Error, Debug)]
pub enum RuncapError {
    #[error("Failed to create anonymous output sink '{name}': {source}")]
    SinkCreation {
        name: String,
        #[source]
        source: nix::Error,
    },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code}")]
    ChildExit { program: String, code: i32 },

    #[error("'{program}' was terminated by signal {signal}")]
    ChildSignaled { program: String, signal: i32 },

    #[error("Failed to allocate {len} bytes for captured output")]
    Allocation { len: u64 },

    #[error("Captured output I/O failed: {source}")]
    SinkIo {
        #[from]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Script error at {file}:{line}: {message}")]
    Script {
        file: String,
        line: usize,
        message: String,
    },
}

impl RuncapError {
    /// The code the whole process exits with when this error reaches `main`.
    ///
    /// Spawn failures propagate the OS error number, child failures propagate
    /// the child's own status, signal deaths follow the shell's `128 + n`.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuncapError::Spawn { source, .. } => source
                .raw_os_error()
                .filter(|code| *code != 0)
                .unwrap_or(GENERIC_FAILURE),
            RuncapError::ChildExit { code, .. } => *code,
            RuncapError::ChildSignaled { signal, .. } => 128 + signal,
            RuncapError::SinkCreation { .. }
            | RuncapError::Wait { .. }
            | RuncapError::Allocation { .. }
            | RuncapError::SinkIo { .. }
            | RuncapError::Config(_)
            | RuncapError::Script { .. } => GENERIC_FAILURE,
        }
    }
}

/// Finds the first `RuncapError` in an error chain and returns its exit code,
/// or `GENERIC_FAILURE` when the chain holds none.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RuncapError>())
        .map_or(GENERIC_FAILURE, RuncapError::exit_code)
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
