//! Environmental profile of a region

use serde::{Deserialize, Serialize};

/// Terrain class driving the synthetic elevation range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegionClass {
    Coastal,
    Mountain,
    #[default]
    Other,
}

impl RegionClass {
    /// Elevation range in meters as `(base, span)`: values fall in `[base, base + span]`
    #[must_use]
    pub fn elevation_range(self) -> (f64, f64) {
        match self {
            RegionClass::Coastal => (100.0, 300.0),
            RegionClass::Mountain => (1000.0, 3000.0),
            RegionClass::Other => (200.0, 500.0),
        }
    }
}

/// Vegetation and terrain signals for one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalProfile {
    /// Normalized Difference Vegetation Index
    pub ndvi: f64,
    /// Mean elevation in meters
    pub elevation_m: f64,
    /// Class the elevation was drawn for
    pub class: RegionClass,
}

impl Default for EnvironmentalProfile {
    /// Nominal profile: mid-range NDVI at sea level
    fn default() -> Self {
        Self {
            ndvi: 0.5,
            elevation_m: 0.0,
            class: RegionClass::Other,
        }
    }
}
