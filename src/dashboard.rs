//! Presentation-ready dashboard for one selection and target date.
//!
//! Everything the page needs in a single serializable value: headline risk,
//! map markers, forecast cards, indicator series and (for a single region)
//! environmental details. Rendering is left to the client.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::{Aggregator, MAX_FORECAST_DAYS, Selection, point_on_day, select_day, set_mean_on_day};
use crate::catalog::DEFAULT_COORDINATES;
use crate::config::DisplayOptions;
use crate::models::{Coordinates, DailyRisk, RiskScore, Tier, WeatherDay};
use crate::risk::to_risk_score;

/// Seed of the simulated historical fire layer
pub const HISTORICAL_FIRE_SEED: u64 = 42;
pub const HISTORICAL_FIRE_COUNT: usize = 20;
const HISTORICAL_LATITUDE: std::ops::Range<f64> = 32.5..42.0;
const HISTORICAL_LONGITUDE: std::ops::Range<f64> = -124.4..-114.1;

/// Risk marker for one region on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub region: String,
    pub coordinates: Coordinates,
    pub score: RiskScore,
    /// Only filled when the NDVI layer is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndvi: Option<f64>,
}

impl MapMarker {
    /// Tooltip text, e.g. "Fresno: Moderate"
    #[must_use]
    pub fn tooltip(&self) -> String {
        format!("{}: {}", self.region, self.score.tier)
    }
}

/// One day of the forecast strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCard {
    pub date: NaiveDate,
    pub conditions: String,
    pub temperature: String,
    pub score: f64,
    pub tier: Tier,
    pub color: String,
}

impl From<&DailyRisk> for ForecastCard {
    fn from(risk: &DailyRisk) -> Self {
        Self {
            date: risk.date,
            conditions: risk.weather.format_conditions().to_string(),
            temperature: risk.weather.format_temperature(),
            score: risk.score.value,
            tier: risk.score.tier,
            color: risk.score.color.clone(),
        }
    }
}

/// Parallel series for the indicator charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub temperatures: Vec<Option<f64>>,
    pub humidities: Vec<Option<f64>>,
    pub winds: Vec<Option<f64>>,
}

impl IndicatorSeries {
    #[must_use]
    pub fn from_days(days: &[WeatherDay]) -> Self {
        let days = &days[..days.len().min(MAX_FORECAST_DAYS)];
        Self {
            dates: days.iter().map(|d| d.date).collect(),
            temperatures: days.iter().map(|d| d.temperature_f).collect(),
            humidities: days.iter().map(|d| d.humidity_pct).collect(),
            winds: days.iter().map(|d| d.wind_speed_mph).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Environmental and weather details for a single selected region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDetails {
    pub region: String,
    pub ndvi: f64,
    pub elevation_m: f64,
    pub conditions: String,
    pub precipitation_in: f64,
}

/// Simulated past fire location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireMarker {
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub subject: String,
    pub target_date: NaiveDate,
    /// Date of the weather day actually used after clamping
    pub scored_date: NaiveDate,
    pub headline: RiskScore,
    pub weather: WeatherDay,
    pub map: Vec<MapMarker>,
    pub forecast: Vec<ForecastCard>,
    pub indicators: IndicatorSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<RegionDetails>,
    pub historical_fires: Vec<FireMarker>,
    pub options: DisplayOptions,
}

impl Dashboard {
    #[instrument(skip(aggregator), fields(selection = selection.name()))]
    pub async fn build(
        aggregator: &Aggregator,
        selection: &Selection,
        target_date: NaiveDate,
        options: DisplayOptions,
    ) -> Self {
        let (days, profiles, forecast) = tokio::join!(
            aggregator.weather_for(selection),
            aggregator.profiles(selection),
            aggregator.forecast(selection)
        );

        let day = select_day(&days, target_date)
            .cloned()
            .unwrap_or_else(|| WeatherDay::unknown(target_date));

        let map: Vec<MapMarker> = selection
            .regions()
            .iter()
            .zip(&profiles)
            .map(|(region, profile)| MapMarker {
                region: region.name.clone(),
                coordinates: region.coordinates.unwrap_or(DEFAULT_COORDINATES),
                score: point_on_day(&day, profile),
                ndvi: options.show_ndvi_layer.then_some(profile.ndvi),
            })
            .collect();

        let headline = set_mean_on_day(&day, &profiles).unwrap_or_else(|| to_risk_score(0.0));

        let details = match (selection, profiles.first()) {
            (Selection::Region(region), Some(profile)) => Some(RegionDetails {
                region: region.name.clone(),
                ndvi: profile.ndvi,
                elevation_m: profile.elevation_m,
                conditions: day.format_conditions().to_string(),
                precipitation_in: day.precipitation_or_default(),
            }),
            _ => None,
        };

        debug!(
            headline = headline.value,
            markers = map.len(),
            "Dashboard assembled"
        );

        Self {
            subject: selection.name().to_string(),
            target_date,
            scored_date: day.date,
            headline,
            map,
            forecast: forecast.days.iter().map(ForecastCard::from).collect(),
            indicators: IndicatorSeries::from_days(&days),
            details,
            historical_fires: historical_fire_markers(options),
            weather: day,
            options,
        }
    }

    /// Headline caption, e.g. "Fire risk: Moderate (37.5/100)"
    #[must_use]
    pub fn caption(&self) -> String {
        format!("Fire risk: {} ({:.1}/100)", self.headline.tier, self.headline.value)
    }
}

/// Fixed layer of simulated historical fires; empty when disabled
#[must_use]
pub fn historical_fire_markers(options: DisplayOptions) -> Vec<FireMarker> {
    if !options.show_historical_fires {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(HISTORICAL_FIRE_SEED);
    (1..=HISTORICAL_FIRE_COUNT)
        .map(|i| {
            let latitude = rng.random_range(HISTORICAL_LATITUDE);
            let longitude = rng.random_range(HISTORICAL_LONGITUDE);
            FireMarker {
                label: format!("Historical fire #{i}"),
                coordinates: Coordinates::new(latitude, longitude),
            }
        })
        .collect()
}
