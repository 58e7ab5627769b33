// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procout`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procout",
    version,
    about = "Run a command and relay its stdout and stderr line by line.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// Default: `Procout.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Kill the command after this long (e.g. `500ms`, `30s`, `2m`).
    ///
    /// Overrides `[run].timeout`.
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Prefix for every relayed stdout line. Overrides `[output].stdout_prefix`.
    #[arg(long, value_name = "PREFIX")]
    pub stdout_prefix: Option<String>,

    /// Prefix for every relayed stderr line. Overrides `[output].stderr_prefix`.
    #[arg(long, value_name = "PREFIX")]
    pub stderr_prefix: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCOUT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Program and arguments to run. Falls back to `[run].command`.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
