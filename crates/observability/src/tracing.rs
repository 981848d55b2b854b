//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Fallback filter when `RUST_LOG` is unset. The diagnostics and import
/// sinks echo their lines at debug level under `kontor::` targets; raise
/// them selectively, e.g. `RUST_LOG=info,kontor::diagnostics=debug`.
const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Initialize with an explicit fallback filter, used when `RUST_LOG` is
/// unset.
pub fn init_with_default(directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    // JSON logs + timestamps; targets stay visible so the kontor:: echo
    // sources can be told apart.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}
