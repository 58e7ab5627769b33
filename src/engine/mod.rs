// src/engine/mod.rs

//! Run engine used by the `procout` binary.
//!
//! [`Runtime`] launches one command through [`crate::launch`], arms the
//! optional timeout, copies both line streams to output sinks and returns
//! the final [`crate::types::ProcessReport`].

use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::{ConfigFile, parse_timeout};
use crate::errors::Result;

/// Effective settings for one run, after merging CLI flags over the config
/// file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub command: Vec<String>,
    pub timeout: Option<Duration>,
    pub stdout_prefix: String,
    pub stderr_prefix: String,
}

impl RunOptions {
    /// CLI values win; an empty CLI command falls back to `[run].command`.
    pub fn resolve(cfg: &ConfigFile, args: &CliArgs) -> Result<Self> {
        let command = if args.command.is_empty() {
            cfg.run.command.clone()
        } else {
            args.command.clone()
        };

        let timeout = match args.timeout.as_deref() {
            Some(s) => Some(parse_timeout(s, "--timeout")?),
            None => cfg.run.timeout,
        };

        Ok(Self {
            command,
            timeout,
            stdout_prefix: args
                .stdout_prefix
                .clone()
                .unwrap_or_else(|| cfg.output.stdout_prefix.clone()),
            stderr_prefix: args
                .stderr_prefix
                .clone()
                .unwrap_or_else(|| cfg.output.stderr_prefix.clone()),
        })
    }
}

pub mod runtime;

pub use runtime::Runtime;
