// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, RunSection};
use crate::errors::{ProcoutError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ProcoutError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let timeout = raw
            .run
            .timeout
            .as_deref()
            .map(|s| parse_timeout(s, "[run].timeout"))
            .transpose()?;

        validate_command(&raw.run.command)?;

        let run = RunSection {
            command: raw.run.command,
            timeout,
        };
        Ok(ConfigFile::new_unchecked(run, raw.output))
    }
}

/// An empty command is fine (the CLI may supply one); an empty program name
/// is not.
fn validate_command(command: &[String]) -> Result<()> {
    if let Some(program) = command.first() {
        if program.trim().is_empty() {
            return Err(ProcoutError::ConfigError(
                "[run].command must start with a non-empty program name".to_string(),
            ));
        }
    }
    Ok(())
}

/// Parse a timeout and reject zero, naming `field` in the error.
pub fn parse_timeout(s: &str, field: &str) -> Result<Duration> {
    let dur = parse_duration(s)
        .map_err(|e| ProcoutError::ConfigError(format!("{field}: {e}")))?;
    if dur.is_zero() {
        return Err(ProcoutError::ConfigError(format!(
            "{field} must be greater than zero (got '{s}')"
        )));
    }
    Ok(dur)
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{s}'"))
}
