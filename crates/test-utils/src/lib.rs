pub mod fixture;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single awaited step in an integration test. Child
/// processes that outlive it point at a relay or supervisor that never
/// finished.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Filter used when neither `PROCOUT_LOG` nor `RUST_LOG` is set: relay and
/// supervisor events only, which is what a failing launch test needs.
const DEFAULT_TEST_FILTER: &str = "warn,procout::exec=debug";

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured by the harness and shown for failing tests only.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = ["PROCOUT_LOG", "RUST_LOG"]
            .iter()
            .find_map(|var| EnvFilter::try_from_env(var).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`STEP_TIMEOUT`].
#[track_caller]
pub fn with_timeout<F, T>(f: F) -> impl Future<Output = T>
where
    F: Future<Output = T>,
{
    let caller = std::panic::Location::caller();
    async move {
        match tokio::time::timeout(STEP_TIMEOUT, f).await {
            Ok(value) => value,
            Err(_) => panic!("step at {caller} still pending after {STEP_TIMEOUT:?}; a child or relay is stuck"),
        }
    }
}

/// Drain both streams of a launched process concurrently.
pub async fn collect_both(output: procout::ProcOutput) -> Collected {
    let procout::ProcOutput {
        stdout,
        stderr,
        exit,
        ..
    } = output;
    let ((out, out_end), (err, err_end)) = tokio::join!(stdout.collect(), stderr.collect());
    Collected {
        stdout: out,
        stderr: err,
        stdout_end: out_end,
        stderr_end: err_end,
        report: exit.wait().await,
    }
}

/// Everything observed from one launched process.
#[derive(Debug)]
pub struct Collected {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub stdout_end: procout::StreamEnd,
    pub stderr_end: procout::StreamEnd,
    pub report: Option<procout::ProcessReport>,
}
