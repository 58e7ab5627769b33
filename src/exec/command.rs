// src/exec/command.rs

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Stdio;

use tokio::process::Command;

use crate::errors::{ProcoutError, Result};

/// A validated command line: program followed by its arguments.
///
/// Construction fails for an empty line, so every `CommandLine` has a
/// program to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new<I, S>(line: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut parts = line.into_iter().map(|s| s.as_ref().to_os_string());
        let program = parts.next().ok_or_else(|| {
            ProcoutError::InvalidArgument("empty command line".to_string())
        })?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program name for logs and error messages.
    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Build the tokio command: stdin from the null device, both output
    /// pipes captured, environment and working directory inherited.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
