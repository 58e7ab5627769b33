//! Executable shell-script fixtures for launching real child processes.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tempfile::{Builder, TempPath};

/// The even/odd script: argument `i` goes to stdout as `even <i> <arg>` for
/// even `i`, and to stderr as `odd <i> <arg>` for odd `i`.
pub const EVEN_ODD: &str = r#"#!/bin/bash
declare -a -r argv=( "$@" )
for (( i=0; i < "${#argv[@]}"; i++ )); do
    if (( i % 2 == 0 )) ; then
        echo even "${i}" "${argv[$i]}" >&1
    else
        echo odd "${i}" "${argv[$i]}" >&2
    fi
done
exit 0
"#;

/// A temporary executable script, deleted on drop.
pub struct FakeScript {
    path: TempPath,
    interpreter: String,
}

impl FakeScript {
    /// Write `body` to a fresh `fake*.sh` file and make it executable.
    pub fn new(body: &str) -> Result<Self> {
        let interpreter = body
            .lines()
            .next()
            .and_then(|l| l.strip_prefix("#!"))
            .map(|l| l.trim().to_string())
            .unwrap_or_else(|| "/bin/sh".to_string());

        let mut file = Builder::new().prefix("fake").suffix(".sh").tempfile()?;
        file.write_all(body.as_bytes())?;
        file.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o755))?;
        }

        Ok(Self {
            path: file.into_temp_path(),
            interpreter,
        })
    }

    /// Shorthand for a `/bin/sh` script with the given body.
    pub fn sh(body: &str) -> Result<Self> {
        Self::new(&format!("#!/bin/sh\n{body}\n"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Command line executing the script file directly.
    pub fn exec_line(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.path.to_string_lossy().into_owned())
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }

    /// Command line running the script through its `#!` interpreter.
    ///
    /// Parallel tests fork constantly; a sibling child can briefly hold the
    /// script's write handle and make a direct exec fail with ETXTBSY.
    /// Going through the interpreter only opens the file for reading.
    pub fn command_line(&self, args: &[&str]) -> Vec<String> {
        [self.interpreter.clone(), self.path.to_string_lossy().into_owned()]
            .into_iter()
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }
}
