//! # runcap Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements configuration loading for runcap. Configuration is
//! optional: with no file present, runcap captures `ls` with the argument
//! vector `[""]` into a sink named `run_output`.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit `--config <PATH>` file (when given, nothing else is read)
//! 2. Project-specific `.runcap.toml` in the current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! The merged configuration is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [default_invocation]
//! program = "ls"
//! argv = ["ls", "-1"]
//!
//! [capture]
//! sink_name = "run_output"
//! ```
//!
use crate::common::process::DEFAULT_SINK_NAME;
use crate::core::error::{Result, RuncapError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Longest name `memfd_create` accepts, excluding the terminating NUL.
const MAX_SINK_NAME_LEN: usize = 249;

const PROJECT_CONFIG_FILENAME: &str = ".runcap.toml";

/// The resolved configuration every command works with.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_invocation: InvocationConfig,
    pub capture: CaptureConfig,
}

/// The invocation runcap performs when started without a subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Full argument vector; the first element is the child's `argv[0]`.
    pub argv: Vec<String>,
}

/// Settings for the anonymous output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Name attached to the memfd (visible under `/proc/<pid>/fd`).
    pub sink_name: String,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            argv: default_argv(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sink_name: default_sink_name(),
        }
    }
}

fn default_program() -> String {
    "ls".to_string()
}
fn default_argv() -> Vec<String> {
    vec![String::new()]
}
fn default_sink_name() -> String {
    DEFAULT_SINK_NAME.to_string_lossy().into_owned()
}

/// One configuration file as written on disk. Fields left out are `None`,
/// so a file can also set a value back to its built-in default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    default_invocation: InvocationFile,
    #[serde(default)]
    capture: CaptureFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct InvocationFile {
    program: Option<String>,
    argv: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct CaptureFile {
    sink_name: Option<String>,
}

impl ConfigFile {
    /// Fields set in `self` win; the rest come from `lower`.
    fn layered_over(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            default_invocation: InvocationFile {
                program: self
                    .default_invocation
                    .program
                    .or(lower.default_invocation.program),
                argv: self.default_invocation.argv.or(lower.default_invocation.argv),
            },
            capture: CaptureFile {
                sink_name: self.capture.sink_name.or(lower.capture.sink_name),
            },
        }
    }

    /// Fills every unset field with its built-in default.
    fn resolve(self) -> Config {
        Config {
            default_invocation: InvocationConfig {
                program: self
                    .default_invocation
                    .program
                    .unwrap_or_else(default_program),
                argv: self.default_invocation.argv.unwrap_or_else(default_argv),
            },
            capture: CaptureConfig {
                sink_name: self.capture.sink_name.unwrap_or_else(default_sink_name),
            },
        }
    }
}

/// Loads, merges and validates the configuration.
///
/// With `explicit` set, only that file is read and it must exist. Otherwise
/// the user and project files are merged over the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?.resolve()
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Runcap", "runcap") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.runcap.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the root looking for `.runcap.toml`, stopping
/// at the first directory that holds a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win over user values, field by field.
fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> Config {
    match project {
        Some(project_cfg) => project_cfg.layered_over(user).resolve(),
        None => user.resolve(),
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.default_invocation.program.is_empty() {
        return Err(anyhow!(RuncapError::Config(
            "default_invocation.program cannot be empty.".to_string()
        )));
    }
    if config.default_invocation.program.contains('\0') {
        return Err(anyhow!(RuncapError::Config(
            "default_invocation.program cannot contain a NUL byte.".to_string()
        )));
    }
    if config.default_invocation.argv.iter().any(|arg| arg.contains('\0')) {
        return Err(anyhow!(RuncapError::Config(
            "default_invocation.argv entries cannot contain a NUL byte.".to_string()
        )));
    }
    let sink_name = &config.capture.sink_name;
    if sink_name.is_empty() {
        return Err(anyhow!(RuncapError::Config(
            "capture.sink_name cannot be empty.".to_string()
        )));
    }
    if sink_name.contains('\0') {
        return Err(anyhow!(RuncapError::Config(
            "capture.sink_name cannot contain a NUL byte.".to_string()
        )));
    }
    if sink_name.len() > MAX_SINK_NAME_LEN {
        return Err(anyhow!(RuncapError::Config(format!(
            "capture.sink_name is {} bytes long; the limit is {}.",
            sink_name.len(),
            MAX_SINK_NAME_LEN
        ))));
    }
    Ok(())
}
