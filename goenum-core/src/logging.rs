//! Logging setup using **tracing**.
//!
//! Library code only emits events (`debug!` per file, `warn!` on load
//! failures); the binary picks a subscriber once at startup. Both
//! subscribers write to stderr so stdout stays reserved for reports.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a JSON subscriber on stderr.
///
/// Call once at startup. Filtering follows `RUST_LOG`
/// (e.g. `RUST_LOG=goenum_core=debug`).
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Installs a compact human-readable subscriber on stderr.
pub fn init_plain_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
