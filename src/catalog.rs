//! Region catalog: region name -> class and display coordinates.
//!
//! The built-in catalog covers the California counties the dashboard ships
//! with. External catalogs can be loaded from JSON. Lookups never fail: an
//! uncataloged region is classed [`RegionClass::Other`] and placed at
//! [`DEFAULT_COORDINATES`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Coordinates, Region, RegionClass, RegionSet};
use crate::Result;

/// Map center used for regions without known coordinates
pub const DEFAULT_COORDINATES: Coordinates = Coordinates::new(37.5, -119.5);

/// Area token for the whole-state weather query
pub const STATE_WEATHER_TOKEN: &str = "california";

const COUNTY_COORDINATES: [(&str, f64, f64); 10] = [
    ("Los Angeles", 34.0522, -118.2437),
    ("San Diego", 32.7157, -117.1611),
    ("San Francisco", 37.7749, -122.4194),
    ("Sacramento", 38.5816, -121.4944),
    ("Fresno", 36.7378, -119.7871),
    ("Alameda", 37.6017, -121.7195),
    ("Orange", 33.7175, -117.8311),
    ("Santa Clara", 37.3541, -121.9552),
    ("Riverside", 33.9533, -117.3962),
    ("San Bernardino", 34.1083, -117.2898),
];

const COASTAL_COUNTIES: [&str; 5] = ["Los Angeles", "San Diego", "Orange", "San Francisco", "Marin"];

const MOUNTAIN_COUNTIES: [&str; 5] = ["Sierra", "Alpine", "Mono", "Inyo", "Plumas"];

/// One catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub class: RegionClass,
    /// Entries without coordinates are classified but not mapped
    pub coordinates: Option<Coordinates>,
}

/// Name-keyed region catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionCatalog {
    /// Display name of the whole catalog as a region set
    pub name: String,
    /// Weather token used for the whole-catalog aggregate
    pub weather_token: String,
    entries: Vec<CatalogEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RegionCatalog {
    /// Builds a catalog; later duplicates replace earlier entries.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        weather_token: impl Into<String>,
        entries: Vec<CatalogEntry>,
    ) -> Self {
        let mut catalog = Self {
            name: name.into(),
            weather_token: weather_token.into(),
            entries: Vec::with_capacity(entries.len()),
            index: HashMap::new(),
        };
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// The shipped California catalog
    #[must_use]
    pub fn california() -> Self {
        let mut entries: Vec<CatalogEntry> = COUNTY_COORDINATES
            .iter()
            .map(|&(name, latitude, longitude)| CatalogEntry {
                name: name.to_string(),
                class: builtin_class(name),
                coordinates: Some(Coordinates::new(latitude, longitude)),
            })
            .collect();

        // Classified counties without display coordinates
        for name in COASTAL_COUNTIES.iter().chain(MOUNTAIN_COUNTIES.iter()) {
            if !entries.iter().any(|e| e.name == *name) {
                entries.push(CatalogEntry {
                    name: (*name).to_string(),
                    class: builtin_class(name),
                    coordinates: None,
                });
            }
        }

        Self::new("California", STATE_WEATHER_TOKEN, entries)
    }

    /// Parses a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: RegionCatalog = serde_json::from_str(json)?;
        Ok(Self::new(parsed.name, parsed.weather_token, parsed.entries))
    }

    /// Loads a catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    fn insert(&mut self, entry: CatalogEntry) {
        match self.index.get(&entry.name) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Class of `name`; uncataloged regions are [`RegionClass::Other`]
    #[must_use]
    pub fn class_of(&self, name: &str) -> RegionClass {
        match self.get(name) {
            Some(entry) => entry.class,
            None => {
                debug!(region = name, "Region not cataloged, using default class");
                RegionClass::Other
            }
        }
    }

    /// Display coordinates of `name`, or [`DEFAULT_COORDINATES`]
    #[must_use]
    pub fn coordinates_of(&self, name: &str) -> Coordinates {
        self.get(name)
            .and_then(|entry| entry.coordinates)
            .unwrap_or(DEFAULT_COORDINATES)
    }

    /// Resolves a name to a region, cataloged or not
    #[must_use]
    pub fn region(&self, name: &str) -> Region {
        Region::with_coordinates(name, self.coordinates_of(name))
    }

    /// Regions with display coordinates, in catalog order
    #[must_use]
    pub fn mapped_regions(&self) -> Vec<Region> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .coordinates
                    .map(|coords| Region::with_coordinates(entry.name.clone(), coords))
            })
            .collect()
    }

    /// All mapped regions as one set sharing the catalog weather token
    pub fn as_region_set(&self) -> Result<RegionSet> {
        RegionSet::new(self.name.clone(), self.weather_token.clone(), self.mapped_regions())
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_class(name: &str) -> RegionClass {
    if COASTAL_COUNTIES.contains(&name) {
        RegionClass::Coastal
    } else if MOUNTAIN_COUNTIES.contains(&name) {
        RegionClass::Mountain
    } else {
        RegionClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FireRiskError;
    use rstest::rstest;

    #[rstest]
    #[case("Los Angeles", RegionClass::Coastal)]
    #[case("Marin", RegionClass::Coastal)]
    #[case("Mono", RegionClass::Mountain)]
    #[case("Fresno", RegionClass::Other)]
    #[case("Atlantis", RegionClass::Other)]
    fn test_california_classes(#[case] name: &str, #[case] expected: RegionClass) {
        assert_eq!(RegionCatalog::california().class_of(name), expected);
    }

    #[test]
    fn test_uncataloged_region_gets_default_coordinates() {
        let catalog = RegionCatalog::california();
        assert!(!catalog.contains("Atlantis"));
        assert_eq!(catalog.coordinates_of("Atlantis"), DEFAULT_COORDINATES);
        assert_eq!(catalog.region("Atlantis").coordinates, Some(DEFAULT_COORDINATES));
        // Cataloged but unmapped
        assert_eq!(catalog.coordinates_of("Sierra"), DEFAULT_COORDINATES);
    }

    #[test]
    fn test_california_region_set() {
        let catalog = RegionCatalog::california();
        assert_eq!(catalog.len(), 16);
        let set = catalog.as_region_set().unwrap();
        assert_eq!(set.len(), 10);
        assert_eq!(set.weather_token, "california");
        assert_eq!(set.regions[0].name, "Los Angeles");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "Oregon",
            "weather_token": "oregon",
            "entries": [
                {"name": "Lane", "class": "mountain", "coordinates": {"latitude": 43.9, "longitude": -122.8}},
                {"name": "Clatsop", "class": "coastal", "coordinates": null},
                {"name": "Lane", "coordinates": {"latitude": 44.0, "longitude": -123.0}}
            ]
        }"#;

        let catalog = RegionCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        // Duplicate replaced the first entry and defaulted its class
        assert_eq!(catalog.class_of("Lane"), RegionClass::Other);
        assert_eq!(catalog.class_of("Clatsop"), RegionClass::Coastal);
        assert_eq!(catalog.mapped_regions().len(), 1);
    }

    #[test]
    fn test_empty_catalog_has_no_region_set() {
        let catalog = RegionCatalog::new("Empty", "empty", vec![]);
        assert!(matches!(catalog.as_region_set(), Err(FireRiskError::Validation { .. })));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(RegionCatalog::from_json("{").is_err());
    }
}
