// src/exec/supervisor.rs

//! Supervisor task: joins both relays, reaps the child, reports.
//!
//! The caller's token kills the child at any point; the stream-scoped token
//! is released only after the child has been reaped.

use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::types::{ExitOutcome, ProcessReport, StreamEnd, StreamKind};

pub(crate) struct Supervised {
    pub child: Child,
    pub program: String,
    pub stdout_relay: JoinHandle<StreamEnd>,
    pub stderr_relay: JoinHandle<StreamEnd>,
    /// The caller's token; cancelling it kills the child.
    pub cancel: CancellationToken,
    /// Child of `cancel`, observed by the relays.
    pub streams: CancellationToken,
    pub report_tx: oneshot::Sender<ProcessReport>,
}

pub(crate) fn spawn_supervisor(supervised: Supervised) -> JoinHandle<()> {
    tokio::spawn(supervise(supervised))
}

async fn supervise(supervised: Supervised) {
    let Supervised {
        mut child,
        program,
        stdout_relay,
        stderr_relay,
        cancel,
        streams,
        report_tx,
    } = supervised;

    let pid = child.id();
    let mut killed = false;

    let relays = async {
        let (out, err) = tokio::join!(stdout_relay, stderr_relay);
        (
            relay_end(StreamKind::Stdout, pid, out),
            relay_end(StreamKind::Stderr, pid, err),
        )
    };
    tokio::pin!(relays);

    let (stdout_end, stderr_end) = tokio::select! {
        biased;
        ends = &mut relays => ends,
        _ = cancel.cancelled() => {
            killed = force_kill(&mut child, pid, &program);
            relays.await
        }
    };
    debug!(?pid, stdout = %stdout_end, stderr = %stderr_end, "both line relays finished");

    let waited = if killed {
        child.wait().await
    } else {
        tokio::select! {
            biased;
            status = child.wait() => status,
            _ = cancel.cancelled() => {
                killed = force_kill(&mut child, pid, &program);
                child.wait().await
            }
        }
    };

    let outcome = match waited {
        Ok(status) => ExitOutcome::from_status(status),
        Err(e) => {
            error!(?pid, program = %program, error = %e, "waiting for child process failed");
            ExitOutcome::WaitFailed(e.to_string())
        }
    };

    match &outcome {
        ExitOutcome::Success => {
            debug!(?pid, program = %program, "child process exited successfully");
        }
        ExitOutcome::Failed { code, signal } => {
            warn!(
                ?pid,
                program = %program,
                exit_code = ?code,
                signal = ?signal,
                killed,
                "child process exited unsuccessfully: {outcome}"
            );
        }
        ExitOutcome::WaitFailed(_) => {}
    }

    streams.cancel();

    let report = ProcessReport {
        pid,
        outcome,
        stdout: stdout_end,
        stderr: stderr_end,
        killed,
    };
    if report_tx.send(report).is_err() {
        debug!(?pid, "exit handle dropped; report discarded");
    }
}

fn relay_end(
    kind: StreamKind,
    pid: Option<u32>,
    joined: Result<StreamEnd, tokio::task::JoinError>,
) -> StreamEnd {
    match joined {
        Ok(end) => end,
        Err(e) => {
            error!(?pid, stream = %kind, error = %e, "line relay task failed");
            StreamEnd::Aborted
        }
    }
}

/// Start killing the child. Returns whether a kill signal was delivered.
fn force_kill(child: &mut Child, pid: Option<u32>, program: &str) -> bool {
    info!(?pid, program = %program, "cancellation requested; killing child process");
    match child.start_kill() {
        Ok(()) => true,
        Err(e) => {
            // Usually means the child was already reaped.
            debug!(?pid, error = %e, "kill not delivered");
            false
        }
    }
}
