//! Logging setup for benchmark runs.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize tracing with the `info` default filter.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is a
/// no-op, so tests and demos may both invoke it.
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
