//! `FireRisk` - deterministic wildfire risk scoring and forecasting
//!
//! Weather (fetched, or synthesized when the upstream is unavailable) and
//! synthetic vegetation/terrain profiles are scored per region and day, then
//! aggregated over region sets and a forecast horizon. Both sources sit
//! behind a shared TTL cache.

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod environment;
pub mod error;
pub mod models;
pub mod risk;
pub mod seed;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use aggregate::{Aggregator, Selection};
pub use cache::{Cache, CacheKey};
pub use catalog::RegionCatalog;
pub use config::{DisplayOptions, FireRiskConfig};
pub use dashboard::Dashboard;
pub use engine::Engine;
pub use environment::EnvironmentalSource;
pub use error::FireRiskError;
pub use models::{
    DailyRisk, EnvironmentalProfile, ForecastSeries, Region, RegionSet, RiskScore, Tier, WeatherDay,
};
pub use weather::{WeatherProvider, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FireRiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
