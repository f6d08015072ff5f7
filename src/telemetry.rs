//! Tracing subscriber setup driven by [`LoggingConfig`].

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("firerisk={},tower_http=info", logging.level)))?;

    let builder = fmt().with_env_filter(filter).with_target(true);

    match logging.format.as_str() {
        "json" => builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}")),
        _ => builder
            .pretty()
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}")),
    }
}
