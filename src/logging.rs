//! Logging Module
//!
//! Initializes the tracing subscriber for the relay. Output goes to stdout
//! for the hosting runtime to collect; there are no local log files.

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize application logging.
///
/// `level` is used as the default filter directive; the `RUST_LOG`
/// environment variable takes precedence when set. Safe to call more than
/// once (repeated initialization is ignored, which lets tests share a
/// process).
pub fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        debug!("Tracing subscriber already initialized, skipping");
    }
}
