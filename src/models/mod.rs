//! Data models for the `FireRisk` engine
//!
//! - Region: named geographic units and region sets
//! - Weather: daily weather inputs
//! - Environment: vegetation/terrain profile
//! - Risk: bounded score and tier
//! - Forecast: daily risk series

pub mod environment;
pub mod forecast;
pub mod region;
pub mod risk;
pub mod weather;

pub use environment::{EnvironmentalProfile, RegionClass};
pub use forecast::{DailyRisk, ForecastSeries};
pub use region::{Coordinates, Region, RegionSet};
pub use risk::{RiskScore, Tier};
pub use weather::{Condition, WeatherDay};
