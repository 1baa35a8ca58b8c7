//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "KASIR_LOG";

/// Filter used when `--verbose` is off and `KASIR_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. `--verbose` forces debug output for the
/// kasir crates regardless of `KASIR_LOG`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,kasir_client=debug,kasir_cli=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    // A subscriber may already be set, e.g. under test harnesses.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
