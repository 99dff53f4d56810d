//! Logging setup for binaries built on this crate

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honouring `RUST_LOG`, defaulting to `info`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed by an embedding application
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
