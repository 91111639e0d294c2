//! Logging setup for the harness and its demos.

use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by the harness.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. to see the outcome of every single resolution:
///   RUST_LOG=resolver_shootout=TRACE
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}
