//! Logging setup.
//!
//! Diagnostics go to stderr so stdout stays clean for query results and
//! `--json` output. `RUST_LOG` takes precedence over the verbosity flags.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// `quiet` limits output to errors; otherwise each `-v` raises the level
/// one step from `warn`. `debug` (the `-d` flag) implies at least `debug`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    debug: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = level_for(verbose, quiet, debug);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jrquery={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

fn level_for(verbose: u8, quiet: bool, debug: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match (verbose, debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    }
}

static TEST_LOGGING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("jrquery=debug"))
            .with_test_writer()
            .try_init();
    });
}
