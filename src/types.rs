use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Which of the child's output pipes a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a line relay stopped producing lines.
///
/// - `Eof`: the child closed the pipe (normal termination).
/// - `Cancelled`: the stream-scoped cancellation token fired; a line that was
///   waiting to be handed off at that point is dropped.
/// - `ReadFailed`: reading the pipe failed with something other than EOF.
/// - `Detached`: the consumer dropped its `LineStream`.
/// - `Aborted`: the relay task ended without reporting (panic / runtime
///   shutdown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    Eof,
    Cancelled,
    ReadFailed { kind: io::ErrorKind, message: String },
    Detached,
    Aborted,
}

impl StreamEnd {
    pub fn read_failed(err: &io::Error) -> Self {
        StreamEnd::ReadFailed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// True when the stream ended because the child closed it.
    pub fn is_eof(&self) -> bool {
        matches!(self, StreamEnd::Eof)
    }
}

impl fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamEnd::Eof => f.write_str("end of stream"),
            StreamEnd::Cancelled => f.write_str("cancelled"),
            StreamEnd::ReadFailed { message, .. } => write!(f, "read failed: {message}"),
            StreamEnd::Detached => f.write_str("consumer detached"),
            StreamEnd::Aborted => f.write_str("relay aborted"),
        }
    }
}

/// How the child process terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// Non-zero exit (`code`) or death by signal (`signal`, unix only).
    Failed {
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// Waiting on the child failed; its real status is unknown.
    WaitFailed(String),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return ExitOutcome::Success;
        }

        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        ExitOutcome::Failed {
            code: status.code(),
            signal,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Success)
    }

    /// Shell-style exit code: the child's own code, `128 + signal` for
    /// signal deaths, `1` when nothing better is known.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitOutcome::Success => 0,
            ExitOutcome::Failed { code: Some(code), .. } => *code,
            ExitOutcome::Failed {
                code: None,
                signal: Some(sig),
            } => 128 + sig,
            ExitOutcome::Failed { .. } | ExitOutcome::WaitFailed(_) => 1,
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Success => f.write_str("exit status: 0"),
            ExitOutcome::Failed { code: Some(code), .. } => write!(f, "exit status: {code}"),
            ExitOutcome::Failed {
                signal: Some(sig), ..
            } => write!(f, "terminated by signal {sig}"),
            ExitOutcome::Failed { .. } => f.write_str("terminated abnormally"),
            ExitOutcome::WaitFailed(msg) => write!(f, "wait failed: {msg}"),
        }
    }
}

/// Everything the supervisor learned about one finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub pid: Option<u32>,
    pub outcome: ExitOutcome,
    pub stdout: StreamEnd,
    pub stderr: StreamEnd,
    /// The caller's cancellation token forced a kill.
    pub killed: bool,
}

impl ProcessReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}
