// tests/launch_streams.rs
#![cfg(unix)]

use std::error::Error;

use tokio_util::sync::CancellationToken;

use procout::{ExitOutcome, StreamEnd, launch};
use procout_test_utils::fixture::{EVEN_ODD, FakeScript};
use procout_test_utils::{collect_both, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn even_odd_arguments_are_split_per_stream() -> TestResult {
    init_tracing();

    let script = FakeScript::new(EVEN_ODD)?;
    let cancel = CancellationToken::new();
    let output = launch(&cancel, script.command_line(&["zero", "one", "two"]))?;

    let got = with_timeout(collect_both(output)).await;

    assert_eq!(got.stdout, vec!["even 0 zero", "even 2 two"]);
    assert_eq!(got.stderr, vec!["odd 1 one"]);
    assert_eq!(got.stdout_end, StreamEnd::Eof);
    assert_eq!(got.stderr_end, StreamEnd::Eof);

    let report = got.report.expect("supervisor must publish a report");
    assert_eq!(report.outcome, ExitOutcome::Success);
    assert!(!report.killed);
    Ok(())
}

#[tokio::test]
async fn direct_exec_of_script_works() -> TestResult {
    init_tracing();

    let script = FakeScript::new(EVEN_ODD)?;
    let cancel = CancellationToken::new();

    // Direct exec can race with sibling tests' forks (ETXTBSY); retry a few
    // times before giving up.
    let mut attempts = 0;
    let output = loop {
        match launch(&cancel, script.exec_line(&["a", "b"])) {
            Ok(output) => break output,
            Err(_) if attempts < 5 => {
                attempts += 1;
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    let got = with_timeout(collect_both(output)).await;
    assert_eq!(got.stdout, vec!["even 0 a"]);
    assert_eq!(got.stderr, vec!["odd 1 b"]);
    Ok(())
}

#[tokio::test]
async fn interleaved_writes_keep_per_stream_order() -> TestResult {
    init_tracing();

    let script = FakeScript::new(
        r#"#!/bin/bash
for (( i=0; i < 500; i++ )); do
    if (( i % 3 == 0 )); then
        echo "err ${i}" >&2
    else
        echo "out ${i}"
    fi
done
"#,
    )?;
    let cancel = CancellationToken::new();
    let output = launch(&cancel, script.command_line(&[]))?;
    let got = with_timeout(collect_both(output)).await;

    let want_out: Vec<String> = (0..500)
        .filter(|i| i % 3 != 0)
        .map(|i| format!("out {i}"))
        .collect();
    let want_err: Vec<String> = (0..500)
        .filter(|i| i % 3 == 0)
        .map(|i| format!("err {i}"))
        .collect();

    assert_eq!(got.stdout, want_out);
    assert_eq!(got.stderr, want_err);
    Ok(())
}

#[tokio::test]
async fn crlf_and_unterminated_tail_are_normalised() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(
        &cancel,
        ["sh", "-c", r"printf 'a\r\nb\n\nc'; printf 'tail' >&2"],
    )?;
    let got = with_timeout(collect_both(output)).await;

    assert_eq!(got.stdout, vec!["a", "b", "", "c"]);
    assert_eq!(got.stderr, vec!["tail"]);
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(&cancel, ["sh", "-c", r"printf 'caf\303\251 \377\nnext\n'"])?;
    let got = with_timeout(collect_both(output)).await;

    assert_eq!(got.stdout, vec!["caf\u{e9} \u{fffd}", "next"]);
    assert_eq!(got.stdout_end, StreamEnd::Eof);
    Ok(())
}

#[tokio::test]
async fn silent_process_closes_both_streams() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(&cancel, ["true"])?;
    let pid = output.pid;
    let got = with_timeout(collect_both(output)).await;

    assert!(got.stdout.is_empty());
    assert!(got.stderr.is_empty());
    let report = got.report.expect("report");
    assert_eq!(report.pid, pid);
    assert!(report.outcome.success());
    Ok(())
}

#[tokio::test]
async fn stdin_is_the_null_device() -> TestResult {
    init_tracing();

    // `cat` would block forever on an inherited terminal.
    let cancel = CancellationToken::new();
    let output = launch(&cancel, ["cat"])?;
    let got = with_timeout(collect_both(output)).await;

    assert!(got.stdout.is_empty());
    assert!(got.report.expect("report").outcome.success());
    Ok(())
}

#[tokio::test]
async fn failed_exit_is_reported_but_streams_end_cleanly() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(&cancel, ["sh", "-c", "echo before; echo why >&2; exit 3"])?;
    let got = with_timeout(collect_both(output)).await;

    assert_eq!(got.stdout, vec!["before"]);
    assert_eq!(got.stderr, vec!["why"]);
    assert_eq!(got.stdout_end, StreamEnd::Eof);
    assert_eq!(got.stderr_end, StreamEnd::Eof);

    let report = got.report.expect("report");
    assert_eq!(
        report.outcome,
        ExitOutcome::Failed {
            code: Some(3),
            signal: None
        }
    );
    assert_eq!(report.exit_code(), 3);
    assert!(!report.killed);
    Ok(())
}

#[tokio::test]
async fn large_output_is_delivered_completely() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(&cancel, ["sh", "-c", "seq 1 20000; seq 1 5000 >&2"])?;
    let got = with_timeout(collect_both(output)).await;

    assert_eq!(got.stdout.len(), 20000);
    assert_eq!(got.stdout.first().map(String::as_str), Some("1"));
    assert_eq!(got.stdout.last().map(String::as_str), Some("20000"));
    assert_eq!(got.stderr.len(), 5000);
    Ok(())
}

#[tokio::test]
async fn dropping_one_stream_does_not_stall_the_other() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let output = launch(
        &cancel,
        ["sh", "-c", "echo done; i=0; while [ $i -lt 200 ]; do echo noise >&2; i=$((i+1)); done"],
    )?;

    let procout::ProcOutput {
        stdout,
        stderr,
        exit,
        ..
    } = output;
    drop(stderr);

    let (lines, end) = with_timeout(stdout.collect()).await;
    assert_eq!(lines, vec!["done"]);
    assert_eq!(end, StreamEnd::Eof);

    let report = with_timeout(exit.wait()).await.expect("report");
    assert_eq!(report.stderr, StreamEnd::Detached);
    Ok(())
}

#[tokio::test]
async fn next_line_then_end_reason() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let mut output = launch(&cancel, ["sh", "-c", "echo one; echo two"])?;

    assert_eq!(output.stdout.kind(), procout::StreamKind::Stdout);
    assert_eq!(output.stderr.kind(), procout::StreamKind::Stderr);

    assert_eq!(with_timeout(output.stdout.next_line()).await.as_deref(), Some("one"));
    assert_eq!(with_timeout(output.stdout.next_line()).await.as_deref(), Some("two"));
    assert_eq!(with_timeout(output.stdout.next_line()).await, None);
    assert_eq!(output.stdout.end(), Some(&StreamEnd::Eof));

    assert_eq!(with_timeout(output.stderr.next_line()).await, None);
    assert_eq!(output.stderr.end(), Some(&StreamEnd::Eof));
    Ok(())
}
