// tests/launch_errors.rs
#![cfg(unix)]

use std::error::Error;
use std::io;

use tokio_util::sync::CancellationToken;

use procout::errors::ProcoutError;
use procout::launch;
use procout_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// No runtime is running here: a spawn attempt would panic, so getting an
/// error back proves nothing was started.
#[test]
fn empty_command_line_is_rejected_before_spawning() {
    let cancel = CancellationToken::new();

    match launch(&cancel, Vec::<String>::new()) {
        Err(ProcoutError::InvalidArgument(msg)) => assert!(msg.contains("empty command line")),
        Err(e) => panic!("expected InvalidArgument, got {e:?}"),
        Ok(_) => panic!("expected an error for an empty command line"),
    }
}

#[test]
fn cancelled_token_prevents_start() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    match launch(&cancel, ["echo", "never"]) {
        Err(ProcoutError::Cancelled { program }) => assert_eq!(program, "echo"),
        Err(e) => panic!("expected Cancelled, got {e:?}"),
        Ok(_) => panic!("expected an error for a cancelled token"),
    }
}

#[tokio::test]
async fn missing_program_is_a_start_failure() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let err = launch(&cancel, ["/definitely/not/a/real/binary", "arg"])
        .err()
        .ok_or("launch of a missing binary must fail")?;

    match &err {
        ProcoutError::StartFailure { program, source } => {
            assert_eq!(program, "/definitely/not/a/real/binary");
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected StartFailure, got {other:?}"),
    }
    assert!(err.to_string().contains("/definitely/not/a/real/binary"));
    Ok(())
}

#[tokio::test]
async fn non_executable_file_is_a_start_failure() -> TestResult {
    init_tracing();

    // No execute bit at all: even root gets EACCES from execve.
    let file = tempfile::Builder::new().suffix(".sh").tempfile()?;
    std::fs::write(file.path(), "#!/bin/sh\necho hi\n")?;

    let cancel = CancellationToken::new();
    let err = launch(&cancel, [file.path()])
        .err()
        .ok_or("launch of a non-executable file must fail")?;

    match err {
        ProcoutError::StartFailure { source, .. } => {
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected StartFailure, got {other:?}"),
    }
    Ok(())
}
