//! tracing setup for the `pact` binary and unit tests.
//!
//! Logs go to stderr. stdout carries only command output, which the CLI tests
//! match on.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber at `info` unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_level("info")
}

/// Install the subscriber with `default_level` as the fallback filter
///
/// The CLI passes `warn`, or `debug` under `--verbose`. `RUST_LOG` wins over
/// both.
pub fn init_with_level(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route engine logs into the test harness output; safe to call repeatedly
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
