//! Tracing subscriber setup.
//!
//! Services only emit `tracing` events; installing a subscriber is left to
//! whoever owns the process (a server binary or a test harness).

use tracing_subscriber::EnvFilter;

use crate::error::{MockStackError, MockStackResult};

/// Build the filter for a subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` is parsed as an
/// [`EnvFilter`] directive string.
fn build_filter(log_level: &str) -> MockStackResult<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    EnvFilter::try_new(log_level)
        .map_err(|e| MockStackError::Config(format!("invalid log level filter {log_level}: {e}")))
}

/// Install a global fmt subscriber filtered by `log_level`.
///
/// # Errors
///
/// Returns [`MockStackError::Config`] for an unparsable filter and
/// [`MockStackError::Internal`] when a global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> MockStackResult<()> {
    let filter = build_filter(log_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| MockStackError::Internal(anyhow::anyhow!("failed to install subscriber: {e}")))
}

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from every test: a subscriber installed by an earlier call
/// is kept, and an unparsable level falls back to `warn`.
pub fn init_test_tracing(log_level: &str) {
    let filter = build_filter(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
