//! Region model: named geographic units and named sets of them

use serde::{Deserialize, Serialize};

use crate::{FireRiskError, Result};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as "lat, lon" with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A named region (e.g. a county)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Region {
    /// Region name; also its identity for deterministic profiles
    pub name: String,
    /// Display coordinates, if known
    pub coordinates: Option<Coordinates>,
}

impl Region {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            coordinates: Some(coordinates),
        }
    }

    /// Location token used in upstream weather queries ("Los Angeles" -> "losangeles")
    #[must_use]
    pub fn weather_token(&self) -> String {
        weather_token(&self.name)
    }
}

/// Lowercases and strips whitespace.
#[must_use]
pub fn weather_token(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A named, non-empty set of regions sharing one weather series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegionSet {
    pub name: String,
    /// Location token for the shared weather query (e.g. "california")
    pub weather_token: String,
    pub regions: Vec<Region>,
}

impl RegionSet {
    /// Builds a region set; an empty member list has no mean and is rejected.
    pub fn new(
        name: impl Into<String>,
        weather_token: impl Into<String>,
        regions: Vec<Region>,
    ) -> Result<Self> {
        let name = name.into();
        if regions.is_empty() {
            return Err(FireRiskError::validation(format!(
                "Region set '{name}' must contain at least one region"
            )));
        }

        Ok(Self {
            name,
            weather_token: weather_token.into(),
            regions,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
