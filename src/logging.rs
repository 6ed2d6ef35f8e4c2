//! Diagnostic logging
//!
//! User-facing progress goes to stdout with `println!`. Diagnostics go through
//! `tracing` to stderr, filtered by `LICENSE_YEAR_LOG` (e.g. `license_year=debug`).

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "LICENSE_YEAR_LOG";

/// Install the global subscriber
///
/// A debug-enabled Actions run (`RUNNER_DEBUG=1`) defaults to `debug`.
pub fn init() {
  let default = if std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1") {
    "debug"
  } else {
    "warn"
  };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

  // A second init (tests) keeps the first subscriber
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time(),
    )
    .try_init();
}
