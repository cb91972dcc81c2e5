//! # runcap Process Capture (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! This module runs a program as a child process and returns everything the
//! child wrote to its standard output as a byte buffer. The child's stdout is
//! not a pipe: it is a duplicate of an anonymous memory-backed file (a Linux
//! memfd), so the child can write any amount of output without the parent
//! draining it concurrently.
//!
//! ## Architecture
//!
//! A single call to [`ProcessCapture::capture`] performs these steps:
//!
//! 1. Create the anonymous sink with `memfd_create` (close-on-exec).
//! 2. Hand a duplicate of the sink to the child as its stdout. The
//!    redirection is applied in the child's pre-exec setup, so the parent's
//!    own stdout is untouched. stdin and stderr are inherited.
//! 3. Spawn the program, resolved through `PATH`, with the parent's
//!    environment and the requested argument vector (including `argv[0]`).
//! 4. Block until the child exits. Interrupted waits are retried by `std`.
//! 5. Reject non-zero exits and signal deaths.
//! 6. Measure the sink by seeking to its end, rewind, reserve exactly that
//!    many bytes, and read them back with a loop that tolerates short reads.
//! 7. Drop the sink, closing its descriptor exactly once.
//!
//! Every failure is returned as a [`RuncapError`] carrying the exit code the
//! process should terminate with; nothing here exits the process.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{ChildInvocation, ProcessCapture};
//!
//! let invocation = ChildInvocation::with_argv("printf", ["printf", "hello"]);
//! let bytes = ProcessCapture::default().capture(&invocation)?;
//! assert_eq!(bytes, b"hello");
//! ```
//!
use crate::core::error::{Result, RuncapError};
use nix::sys::memfd::{memfd_create, MemFdCreateFlag};
use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, trace};

/// Sink name used when no configuration overrides it.
pub const DEFAULT_SINK_NAME: &CStr = c"run_output";

/// A program to run and the complete argument vector to run it with.
///
/// `argv[0]` is part of `argv`; when `argv` is empty the program name is used
/// as `argv[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildInvocation {
    pub program: String,
    pub argv: Vec<String>,
}

impl ChildInvocation {
    /// An invocation whose `argv[0]` is the program name.
    #[cfg(test)]
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            argv: vec![program.clone()],
            program,
        }
    }

    /// An invocation with an explicit argument vector, `argv[0]` included.
    pub fn with_argv<I, S>(program: impl Into<String>, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends one argument after the existing vector.
    #[cfg(test)]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        if self.argv.is_empty() {
            self.argv.push(self.program.clone());
        }
        self.argv.push(arg.into());
        self
    }

    /// The child's `argv[0]`.
    pub fn arg0(&self) -> &str {
        self.argv.first().map_or(self.program.as_str(), String::as_str)
    }

    /// Arguments following `argv[0]`.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

/// Runs programs with stdout redirected into an anonymous in-memory file.
#[derive(Debug, Clone)]
pub struct ProcessCapture {
    sink_name: CString,
}

impl Default for ProcessCapture {
    fn default() -> Self {
        Self {
            sink_name: DEFAULT_SINK_NAME.to_owned(),
        }
    }
}

impl ProcessCapture {
    /// Creates a capturer whose sinks carry `sink_name` (shown in `/proc/<pid>/fd`).
    pub fn new(sink_name: &str) -> Result<Self> {
        let sink_name = CString::new(sink_name).map_err(|_| {
            RuncapError::Config(format!(
                "Sink name {:?} contains a NUL byte.",
                sink_name
            ))
        })?;
        Ok(Self { sink_name })
    }

    /// Runs `invocation` to completion and returns exactly the bytes it
    /// wrote to stdout.
    ///
    /// # Errors
    ///
    /// - `RuncapError::SinkCreation` if the memfd cannot be created.
    /// - `RuncapError::Spawn` if the program cannot be started.
    /// - `RuncapError::Wait` if waiting fails for a reason other than interruption.
    /// - `RuncapError::ChildExit` / `RuncapError::ChildSignaled` if the child did not exit 0.
    /// - `RuncapError::Allocation` if the capture buffer cannot be reserved.
    /// - `RuncapError::SinkIo` if the sink cannot be duplicated, seeked or read.
    pub fn capture(&self, invocation: &ChildInvocation) -> Result<Vec<u8>> {
        let program = invocation.program.as_str();
        let mut sink = self.create_sink()?;
        let child_stdout = sink.try_clone().map_err(RuncapError::from)?;

        let mut child = {
            let mut command = Command::new(program);
            command
                .arg0(invocation.arg0())
                .args(invocation.args())
                .stdout(Stdio::from(child_stdout));
            debug!(
                "Spawning '{}' with argv {:?} into sink {:?}",
                program, invocation.argv, self.sink_name
            );
            command.spawn().map_err(|source| RuncapError::Spawn {
                program: program.to_string(),
                source,
            })?
        };
        info!("Spawned '{}' (pid {})", program, child.id());

        let status = child.wait().map_err(|source| RuncapError::Wait {
            program: program.to_string(),
            source,
        })?;
        check_exit_status(program, status)?;

        let output = drain_sink(&mut sink)?;
        debug!("Captured {} bytes from '{}'", output.len(), program);
        Ok(output)
    }

    fn create_sink(&self) -> Result<File> {
        let fd = memfd_create(self.sink_name.as_c_str(), MemFdCreateFlag::MFD_CLOEXEC).map_err(
            |source| RuncapError::SinkCreation {
                name: self.sink_name.to_string_lossy().into_owned(),
                source,
            },
        )?;
        Ok(File::from(fd))
    }
}

/// Accepts only a normal exit with status 0.
fn check_exit_status(program: &str, status: ExitStatus) -> Result<()> {
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(RuncapError::ChildExit {
            program: program.to_string(),
            code,
        }
        .into()),
        None => Err(RuncapError::ChildSignaled {
            program: program.to_string(),
            signal: status.signal().unwrap_or_default(),
        }
        .into()),
    }
}

/// Reads a sink's full contents from the start.
///
/// The length is taken from the end-of-stream offset before reading, and the
/// buffer is reserved to exactly that size. `read_to_end` keeps calling
/// `read` until the length is consumed or the source reports EOF, so short
/// reads are harmless.
fn drain_sink<R: Read + Seek>(sink: &mut R) -> Result<Vec<u8>> {
    let len = sink.seek(SeekFrom::End(0)).map_err(RuncapError::from)?;
    sink.seek(SeekFrom::Start(0)).map_err(RuncapError::from)?;
    trace!("Sink holds {} bytes", len);

    let capacity = usize::try_from(len).map_err(|_| RuncapError::Allocation { len })?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| RuncapError::Allocation { len })?;

    sink.take(len)
        .read_to_end(&mut buffer)
        .map_err(RuncapError::from)?;
    Ok(buffer)
}
