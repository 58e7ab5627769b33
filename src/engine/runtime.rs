// src/engine/runtime.rs

use anyhow::anyhow;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stderr, Stdout};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::RunOptions;
use crate::errors::Result;
use crate::exec::{CommandLine, ProcOutput, launch_command};
use crate::types::{ProcessReport, StreamKind};

/// Drives a single launch: relays lines into `out` / `err` and waits for the
/// child's report.
pub struct Runtime<O, E> {
    options: RunOptions,
    cancel: CancellationToken,
    out: O,
    err: E,
}

impl Runtime<Stdout, Stderr> {
    /// Runtime printing to the process's own stdout and stderr.
    pub fn stdio(options: RunOptions) -> Self {
        Self::new(options, tokio::io::stdout(), tokio::io::stderr())
    }
}

impl<O, E> Runtime<O, E>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    pub fn new(options: RunOptions, out: O, err: E) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
            out,
            err,
        }
    }

    /// Token that aborts the run (kills the child) when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run to completion and hand back the sinks together with the report.
    pub async fn run(mut self) -> Result<(ProcessReport, O, E)> {
        let line = CommandLine::new(&self.options.command)?;

        let ProcOutput {
            pid,
            stdout,
            stderr,
            exit,
        } = launch_command(&self.cancel, &line)?;

        // Stops the timer once this function returns.
        let finished = CancellationToken::new();
        let _timer_guard = finished.clone().drop_guard();
        if let Some(limit) = self.options.timeout {
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        warn!(?pid, timeout = ?limit, "timeout elapsed; cancelling command");
                        cancel.cancel();
                    }
                    _ = finished.cancelled() => {}
                }
            });
        }

        let mut lines = stdout
            .map(|line| (StreamKind::Stdout, line))
            .merge(stderr.map(|line| (StreamKind::Stderr, line)));

        while let Some((kind, line)) = lines.next().await {
            if let Err(e) = self.write_line(kind, &line).await {
                // Nowhere left to print; stop the child rather than stall it.
                warn!(?pid, stream = %kind, error = %e, "writing relayed line failed");
                self.cancel.cancel();
                return Err(e.into());
            }
        }
        debug!(?pid, "both line streams closed");

        let report = exit
            .wait()
            .await
            .ok_or_else(|| anyhow!("supervisor for pid {pid:?} ended without a report"))?;

        info!(?pid, outcome = %report.outcome, killed = report.killed, "command finished");
        Ok((report, self.out, self.err))
    }

    async fn write_line(&mut self, kind: StreamKind, line: &str) -> std::io::Result<()> {
        let prefix = match kind {
            StreamKind::Stdout => self.options.stdout_prefix.as_str(),
            StreamKind::Stderr => self.options.stderr_prefix.as_str(),
        };
        let mut buf = String::with_capacity(prefix.len() + line.len() + 1);
        buf.push_str(prefix);
        buf.push_str(line);
        buf.push('\n');

        match kind {
            StreamKind::Stdout => write_flush(&mut self.out, &buf).await,
            StreamKind::Stderr => write_flush(&mut self.err, &buf).await,
        }
    }
}

async fn write_flush<W: AsyncWrite + Unpin>(sink: &mut W, text: &str) -> std::io::Result<()> {
    sink.write_all(text.as_bytes()).await?;
    sink.flush().await
}
