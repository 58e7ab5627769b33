// src/exec/launcher.rs

use std::ffi::OsStr;
use std::io;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::{ProcoutError, Result};
use crate::exec::command::CommandLine;
use crate::exec::relay::spawn_relay;
use crate::exec::stream::{ExitHandle, LineStream};
use crate::exec::supervisor::{Supervised, spawn_supervisor};
use crate::types::StreamKind;

/// Handles for one launched child process.
#[derive(Debug)]
pub struct ProcOutput {
    pub pid: Option<u32>,
    pub stdout: LineStream,
    pub stderr: LineStream,
    pub exit: ExitHandle,
}

/// Launch `line` (program followed by arguments) and relay its stdout and
/// stderr as two independent line streams.
///
/// Returns as soon as the relays and the supervisor are running; it never
/// waits for the child. Cancelling `cancel` kills the child and closes both
/// streams. Must be called from within a tokio runtime.
///
/// Errors are only returned for failures before the child runs:
/// an empty line ([`ProcoutError::InvalidArgument`]), an already-cancelled
/// token ([`ProcoutError::Cancelled`]), missing pipes
/// ([`ProcoutError::SetupFailure`]) or a failed exec
/// ([`ProcoutError::StartFailure`]).
pub fn launch<I, S>(cancel: &CancellationToken, line: I) -> Result<ProcOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let line = CommandLine::new(line)?;
    launch_command(cancel, &line)
}

/// Same as [`launch`] for an already validated [`CommandLine`].
pub fn launch_command(cancel: &CancellationToken, line: &CommandLine) -> Result<ProcOutput> {
    let program = line.display_program();

    if cancel.is_cancelled() {
        return Err(ProcoutError::Cancelled { program });
    }

    let mut child = line
        .to_command()
        .spawn()
        .map_err(|source| ProcoutError::StartFailure {
            program: program.clone(),
            source,
        })?;
    let pid = child.id();

    // `kill_on_drop` reaps the child if either pipe is missing.
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| missing_pipe(&program, StreamKind::Stdout))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| missing_pipe(&program, StreamKind::Stderr))?;

    info!(?pid, command = %line, "child process started");

    let streams = cancel.child_token();
    let (stdout, stdout_relay) = spawn_relay(StreamKind::Stdout, stdout, streams.clone(), pid);
    let (stderr, stderr_relay) = spawn_relay(StreamKind::Stderr, stderr, streams.clone(), pid);

    let (report_tx, report_rx) = oneshot::channel();
    spawn_supervisor(Supervised {
        child,
        program,
        stdout_relay,
        stderr_relay,
        cancel: cancel.clone(),
        streams,
        report_tx,
    });
    debug!(?pid, "relays and supervisor running");

    Ok(ProcOutput {
        pid,
        stdout,
        stderr,
        exit: ExitHandle::new(report_rx),
    })
}

fn missing_pipe(program: &str, stream: StreamKind) -> ProcoutError {
    ProcoutError::SetupFailure {
        program: program.to_string(),
        stream,
        source: io::Error::new(io::ErrorKind::BrokenPipe, format!("{stream} was not captured")),
    }
}
