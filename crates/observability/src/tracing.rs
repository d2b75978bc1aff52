//! Subscriber configuration.
//!
//! Security-relevant warnings (dropped role ids, orphan permissions,
//! swallowed audit failures) flow through `tracing::warn!`; operators tune
//! the verbosity with `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber: JSON lines, env-driven filter
/// (default `info`), system-time timestamps.
///
/// Installation is best-effort so tests and embedders that already set a
/// subscriber are left alone.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
