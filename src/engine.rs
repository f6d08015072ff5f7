//! Wiring of catalog, cache, sources and aggregator into one handle.

use std::sync::Arc;

use tracing::info;

use crate::aggregate::{Aggregator, Selection};
use crate::cache::Cache;
use crate::catalog::RegionCatalog;
use crate::config::{DisplayOptions, FireRiskConfig};
use crate::environment::EnvironmentalSource;
use crate::weather::WeatherSource;
use crate::Result;

/// Name selecting the whole catalog
pub const ALL_REGIONS: &str = "all";

/// Shared engine state; cheap to clone
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<RegionCatalog>,
    aggregator: Aggregator,
    display: DisplayOptions,
}

impl Engine {
    #[must_use]
    pub fn new(catalog: Arc<RegionCatalog>, aggregator: Aggregator, display: DisplayOptions) -> Self {
        Self {
            catalog,
            aggregator,
            display,
        }
    }

    /// Builds the engine from configuration: catalog file (or the built-in
    /// California catalog), shared cache and the Visual Crossing provider.
    pub fn from_config(config: &FireRiskConfig) -> Result<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => {
                let catalog = RegionCatalog::load(path)?;
                info!("Loaded catalog '{}' with {} regions from {}", catalog.name, catalog.len(), path);
                catalog
            }
            None => RegionCatalog::california(),
        };
        let catalog = Arc::new(catalog);

        let cache = Cache::new(config.cache.ttl());
        let weather = WeatherSource::from_config(&config.weather, cache.clone())?;
        let environment = EnvironmentalSource::new(cache, catalog.clone());
        let horizon = usize::try_from(config.weather.horizon_days).unwrap_or(1);
        let aggregator = Aggregator::new(weather, environment).with_horizon(horizon);

        Ok(Self::new(catalog, aggregator, config.display))
    }

    #[must_use]
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    #[must_use]
    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    /// Resolves a region query. `None`, blank or "all" select the whole
    /// catalog; names match case-insensitively and unknown names are kept
    /// as uncataloged regions.
    pub fn selection(&self, name: Option<&str>) -> Result<Selection> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        match name {
            None => Ok(Selection::Set(self.catalog.as_region_set()?)),
            Some(n) if n.eq_ignore_ascii_case(ALL_REGIONS) => {
                Ok(Selection::Set(self.catalog.as_region_set()?))
            }
            Some(n) => {
                let canonical = self
                    .catalog
                    .entries()
                    .find(|entry| entry.name.eq_ignore_ascii_case(n))
                    .map_or(n, |entry| entry.name.as_str());
                Ok(Selection::Region(self.catalog.region(canonical)))
            }
        }
    }
}
