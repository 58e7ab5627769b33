// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [run]
/// command = ["make", "test"]
/// timeout = "30s"
///
/// [output]
/// stdout_prefix = ""
/// stderr_prefix = "[stderr] "
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub run: RawRunSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[run]` section as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRunSection {
    /// Command used when none is given on the command line.
    #[serde(default)]
    pub command: Vec<String>,

    /// Duration string like `"250ms"`, `"30s"`, `"2m"`.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// `[output]` section: how relayed lines are printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub stdout_prefix: String,

    #[serde(default)]
    pub stderr_prefix: String,
}

/// Validated `[run]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSection {
    pub command: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub run: RunSection,
    pub output: OutputSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(run: RunSection, output: OutputSection) -> Self {
        Self { run, output }
    }
}
