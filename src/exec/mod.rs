// src/exec/mod.rs

//! Process execution layer.
//!
//! This module launches a child with `tokio::process::Command` and exposes
//! its stdout and stderr as two independently consumed line streams.
//!
//! - [`command`] validates the command line and builds the tokio command.
//! - [`launcher`] owns [`launch`], which spawns the child, the relays and the
//!   supervisor.
//! - [`relay`] splits one pipe into lines and hands them to the consumer.
//! - [`supervisor`] joins both relays, reaps the child and publishes the
//!   [`crate::types::ProcessReport`].
//! - [`stream`] holds the consumer-side handles.

pub mod command;
pub mod launcher;
mod relay;
mod supervisor;
pub mod stream;

pub use command::CommandLine;
pub use launcher::{ProcOutput, launch, launch_command};
pub use stream::{ExitHandle, LineStream};
