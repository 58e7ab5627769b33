// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Only failures that happen *before* the child is running are returned from
//! [`crate::launch`]. Anything after that (read errors, abnormal exit) is
//! reported out of band through [`crate::types::StreamEnd`] and
//! [`crate::types::ProcessReport`].

use thiserror::Error;

use crate::types::StreamKind;

#[derive(Error, Debug)]
pub enum ProcoutError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("launch of '{program}' cancelled before the process was started")]
    Cancelled { program: String },

    /// The child started but one of its output pipes was not handed back.
    ///
    /// tokio creates the pipes as part of the spawn, so a pipe failure
    /// normally surfaces as [`StartFailure`](Self::StartFailure) instead.
    /// This is only returned if a `piped()` stream is absent afterwards; the
    /// child is killed on drop before the error reaches the caller.
    #[error("failed to acquire {stream} pipe for '{program}'")]
    SetupFailure {
        program: String,
        stream: StreamKind,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{program}': {source}")]
    StartFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ProcoutError>;
