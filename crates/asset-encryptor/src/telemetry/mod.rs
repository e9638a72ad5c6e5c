//! Logging setup for the asset encryptor.
//!
//! Human-readable lines on stderr by default, JSON lines when `log_json` is
//! set. `RUST_LOG` takes precedence over the configured level.
//!
//! Key material and plaintext bytes never appear in log fields; only paths,
//! sizes and the (public) IV are logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(log_level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialise asset-encryptor tracing subscriber: {e}"))
}
