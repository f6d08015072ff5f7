//! Daily weather model and display methods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Temperature assumed when upstream omits it (°F)
pub const DEFAULT_TEMPERATURE_F: f64 = 70.0;
/// Humidity assumed when upstream omits it (%)
pub const DEFAULT_HUMIDITY_PCT: f64 = 50.0;
/// Wind speed assumed when upstream omits it (mph)
pub const DEFAULT_WIND_MPH: f64 = 5.0;
/// Precipitation assumed when upstream omits it (inches)
pub const DEFAULT_PRECIP_IN: f64 = 0.0;

/// One day of weather for a region or area, in US units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherDay {
    /// Calendar day
    pub date: NaiveDate,
    /// Mean temperature in °F
    pub temperature_f: Option<f64>,
    /// Relative humidity in %
    pub humidity_pct: Option<f64>,
    /// Wind speed in mph
    pub wind_speed_mph: Option<f64>,
    /// Precipitation in inches
    pub precipitation_in: Option<f64>,
    /// Human-readable condition summary
    pub conditions: Option<String>,
    /// Upstream icon identifier
    pub icon: Option<String>,
    /// True when the value was synthesized instead of fetched
    #[serde(default)]
    pub synthetic: bool,
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

impl WeatherDay {
    /// A day with no measurements; scores with every default applied
    #[must_use]
    pub fn unknown(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_f: None,
            humidity_pct: None,
            wind_speed_mph: None,
            precipitation_in: None,
            conditions: None,
            icon: None,
            synthetic: false,
        }
    }

    /// Temperature, or the default when missing or non-finite
    #[must_use]
    pub fn temperature_or_default(&self) -> f64 {
        finite_or(self.temperature_f, DEFAULT_TEMPERATURE_F)
    }

    #[must_use]
    pub fn humidity_or_default(&self) -> f64 {
        finite_or(self.humidity_pct, DEFAULT_HUMIDITY_PCT)
    }

    #[must_use]
    pub fn wind_or_default(&self) -> f64 {
        finite_or(self.wind_speed_mph, DEFAULT_WIND_MPH)
    }

    #[must_use]
    pub fn precipitation_or_default(&self) -> f64 {
        finite_or(self.precipitation_in, DEFAULT_PRECIP_IN)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        self.temperature_f
            .map_or_else(|| "N/A".to_string(), |t| format!("{t:.0}°F"))
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        self.wind_speed_mph
            .map_or_else(|| "N/A".to_string(), |w| format!("{w:.0} mph"))
    }

    /// Condition text, "N/A" when unknown
    #[must_use]
    pub fn format_conditions(&self) -> &str {
        self.conditions.as_deref().unwrap_or("N/A")
    }
}

/// Conditions drawn for synthetic days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Clear,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Rain,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Rain => "Rain",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Condition::Clear => "clear-day",
            Condition::PartlyCloudy => "partly-cloudy-day",
            Condition::Cloudy => "cloudy",
            Condition::Rain => "rain",
        }
    }
}
