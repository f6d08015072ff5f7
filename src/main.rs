use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use firerisk::config::FireRiskConfig;
use firerisk::engine::Engine;
use firerisk::{telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = FireRiskConfig::load_from_path(config_path)?;

    telemetry::init(&config.logging)?;
    info!("Starting firerisk {}", firerisk::VERSION);
    if config.weather.api_key.is_none() {
        info!("No weather API key configured, forecasts will be synthetic");
    }

    let engine = Engine::from_config(&config).context("Failed to build risk engine")?;
    info!(
        "Catalog '{}' loaded with {} regions",
        engine.catalog().name,
        engine.catalog().len()
    );

    web::run(config.server.port, Arc::new(engine)).await
}
