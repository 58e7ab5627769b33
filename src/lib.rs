// src/lib.rs

//! Launch a child process and consume its stdout and stderr as two
//! independent streams of lines.
//!
//! ```no_run
//! # async fn demo() -> procout::errors::Result<()> {
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let out = procout::launch(&cancel, ["sh", "-c", "echo hi; echo oops >&2"])?;
//!
//! let (stdout, stderr) = tokio::join!(out.stdout.collect(), out.stderr.collect());
//! assert_eq!(stdout.0, vec!["hi"]);
//! assert_eq!(stderr.0, vec!["oops"]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::engine::{RunOptions, Runtime};

pub use crate::exec::{CommandLine, ExitHandle, LineStream, ProcOutput, launch, launch_command};
pub use crate::types::{ExitOutcome, ProcessReport, StreamEnd, StreamKind};

/// High-level entry point used by `main.rs`.
///
/// Loads config, merges CLI flags, runs the command with Ctrl-C wired to
/// cancellation, and returns the exit code `procout` should exit with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;
    let options = RunOptions::resolve(&cfg, &args)?;
    debug!(?options, "resolved run options");

    let runtime = Runtime::stdio(options);

    // Ctrl-C → kill the child; the streams then close on their own.
    {
        let cancel = runtime.cancel_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let (report, _, _) = runtime.run().await?;
    Ok(report.exit_code())
}
