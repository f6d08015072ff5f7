//! Synthetic environmental profiles (NDVI, elevation) per region.
//!
//! Profiles are a pure function of the region name and its catalog class, so
//! the same region always yields bit-identical values. The cache only saves
//! the derivation cost.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{debug, error, instrument};

use crate::cache::{Cache, CacheKey};
use crate::catalog::RegionCatalog;
use crate::models::{EnvironmentalProfile, Region, RegionClass};
use crate::seed::{ELEVATION_SALT, NDVI_SALT, seeded_rng};

const NDVI_BASE: f64 = 0.5;
const NDVI_VARIATION: f64 = 0.3;

/// NDVI for a region: `0.5 + (U - 0.5) * 0.3`, U seeded by the region name
#[must_use]
pub fn synthetic_ndvi(region_name: &str) -> f64 {
    let u: f64 = seeded_rng(NDVI_SALT, region_name).random();
    NDVI_BASE + (u - 0.5) * NDVI_VARIATION
}

/// Elevation in whole meters within the class range, seeded by the region name
#[must_use]
pub fn synthetic_elevation(region_name: &str, class: RegionClass) -> f64 {
    let (base, span) = class.elevation_range();
    let u: f64 = seeded_rng(ELEVATION_SALT, region_name).random();
    (base + u * span).round()
}

#[must_use]
pub fn derive_profile(region_name: &str, class: RegionClass) -> EnvironmentalProfile {
    EnvironmentalProfile {
        ndvi: synthetic_ndvi(region_name),
        elevation_m: synthetic_elevation(region_name, class),
        class,
    }
}

/// Cache-backed provider of [`EnvironmentalProfile`]s
#[derive(Debug, Clone)]
pub struct EnvironmentalSource {
    cache: Cache,
    catalog: Arc<RegionCatalog>,
    ttl: Duration,
}

impl EnvironmentalSource {
    #[must_use]
    pub fn new(cache: Cache, catalog: Arc<RegionCatalog>) -> Self {
        let ttl = cache.default_ttl();
        Self {
            cache,
            catalog,
            ttl,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Profile for `region`. Uncataloged regions use the default class.
    #[instrument(level = "debug", skip(self), fields(region = %region.name))]
    pub async fn profile(&self, region: &Region) -> EnvironmentalProfile {
        let class = self.catalog.class_of(&region.name);
        let key = CacheKey::new("environmental_profile", format!("{}|{class:?}", region.name));
        let name = region.name.clone();

        let cached = self
            .cache
            .get_or_compute(&key, self.ttl, || async move { Ok(derive_profile(&name, class)) })
            .await;

        match cached {
            Ok(profile) => {
                debug!(ndvi = profile.ndvi, elevation_m = profile.elevation_m, "Resolved profile");
                profile
            }
            Err(err) => {
                error!("Environmental profile cache failure for {key}: {err}");
                if cfg!(debug_assertions) {
                    panic!("environmental profile cache failure for {key}: {err}");
                }
                derive_profile(&region.name, class)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RegionCatalog;
    use rstest::rstest;

    fn source() -> EnvironmentalSource {
        EnvironmentalSource::new(Cache::default(), Arc::new(RegionCatalog::california()))
    }

    #[tokio::test]
    async fn test_profile_is_bit_identical_across_calls() {
        let source = source();
        let region = Region::new("Fresno");

        let first = source.profile(&region).await;
        let second = source.profile(&region).await;
        assert_eq!(first.ndvi.to_bits(), second.ndvi.to_bits());
        assert_eq!(first.elevation_m.to_bits(), second.elevation_m.to_bits());

        // Same values without the cache
        let fresh = derive_profile("Fresno", RegionClass::Other);
        assert_eq!(first.ndvi.to_bits(), fresh.ndvi.to_bits());
    }

    #[tokio::test]
    async fn test_independent_sources_agree() {
        let a = source().profile(&Region::new("Los Angeles")).await;
        let b = source().profile(&Region::new("Los Angeles")).await;
        assert_eq!(a, b);
    }

    #[rstest]
    #[case("Los Angeles", 100.0, 400.0)]
    #[case("San Francisco", 100.0, 400.0)]
    #[case("Alpine", 1000.0, 4000.0)]
    #[case("Inyo", 1000.0, 4000.0)]
    #[case("Fresno", 200.0, 700.0)]
    #[case("Nowhere County", 200.0, 700.0)]
    #[tokio::test]
    async fn test_elevation_follows_class(#[case] name: &str, #[case] min: f64, #[case] max: f64) {
        let profile = source().profile(&Region::new(name)).await;
        assert!(
            (min..=max).contains(&profile.elevation_m),
            "{name}: {} not in [{min}, {max}]",
            profile.elevation_m
        );
        assert_eq!(profile.elevation_m, profile.elevation_m.round());
    }

    #[test]
    fn test_ndvi_range() {
        for name in ["Los Angeles", "Sierra", "Fresno", "", "Ventura", "Kern"] {
            let ndvi = synthetic_ndvi(name);
            assert!((0.35..=0.65).contains(&ndvi), "{name}: {ndvi}");
        }
    }

    #[test]
    fn test_regions_differ() {
        assert_ne!(
            synthetic_ndvi("Fresno").to_bits(),
            synthetic_ndvi("Sacramento").to_bits()
        );
    }
}
