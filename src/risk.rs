//! Fire risk model.
//!
//! ```text
//! raw   = 0.3*temp_F - 0.2*humidity_pct + 1.5*wind_mph - 15*precip_in
//!       + 10*ndvi + 0.01*elevation_m
//! score = clamp(raw, 0, 100)
//! ```
//!
//! Scoring and classification are separate so the tier boundaries can be
//! tested on their own. Nothing here fails: missing or non-finite inputs fall
//! back to nominal values and the result is always clamped.

use crate::models::{EnvironmentalProfile, RiskScore, Tier, WeatherDay};

pub const TEMPERATURE_WEIGHT: f64 = 0.3;
pub const HUMIDITY_WEIGHT: f64 = -0.2;
pub const WIND_WEIGHT: f64 = 1.5;
pub const PRECIPITATION_WEIGHT: f64 = -15.0;
pub const NDVI_WEIGHT: f64 = 10.0;
pub const ELEVATION_WEIGHT: f64 = 0.01;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

const NOMINAL_NDVI: f64 = 0.5;

/// Scoring inputs with defaults already applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    pub temperature_f: f64,
    pub humidity_pct: f64,
    pub wind_mph: f64,
    pub precipitation_in: f64,
    pub ndvi: f64,
    pub elevation_m: f64,
}

impl RiskInputs {
    #[must_use]
    pub fn from_day(day: &WeatherDay, profile: &EnvironmentalProfile) -> Self {
        Self {
            temperature_f: day.temperature_or_default(),
            humidity_pct: day.humidity_or_default(),
            wind_mph: day.wind_or_default(),
            precipitation_in: day.precipitation_or_default(),
            ndvi: if profile.ndvi.is_finite() { profile.ndvi } else { NOMINAL_NDVI },
            elevation_m: if profile.elevation_m.is_finite() {
                profile.elevation_m.max(0.0)
            } else {
                0.0
            },
        }
    }
}

/// Unclamped linear score
#[must_use]
pub fn raw_score(inputs: &RiskInputs) -> f64 {
    TEMPERATURE_WEIGHT * inputs.temperature_f
        + HUMIDITY_WEIGHT * inputs.humidity_pct
        + WIND_WEIGHT * inputs.wind_mph
        + PRECIPITATION_WEIGHT * inputs.precipitation_in
        + NDVI_WEIGHT * inputs.ndvi
        + ELEVATION_WEIGHT * inputs.elevation_m
}

/// Clamps to [0, 100]; NaN maps to 0.
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Bounded score for the given inputs
#[must_use]
pub fn risk_score(inputs: &RiskInputs) -> f64 {
    clamp_score(raw_score(inputs))
}

/// Tier for a score. Out-of-range values are clamped first.
#[must_use]
pub fn classify(score: f64) -> Tier {
    let score = clamp_score(score);
    if score < Tier::Moderate.lower_bound() {
        Tier::Low
    } else if score < Tier::High.lower_bound() {
        Tier::Moderate
    } else if score < Tier::Extreme.lower_bound() {
        Tier::High
    } else {
        Tier::Extreme
    }
}

/// Wraps an already computed score with its tier and color.
#[must_use]
pub fn to_risk_score(score: f64) -> RiskScore {
    let value = clamp_score(score);
    let tier = classify(value);
    RiskScore {
        value,
        tier,
        color: tier.color().to_string(),
    }
}

/// Scores one day of weather against a region profile.
#[must_use]
pub fn assess(day: &WeatherDay, profile: &EnvironmentalProfile) -> RiskScore {
    to_risk_score(risk_score(&RiskInputs::from_day(day, profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegionClass;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn inputs(temp: f64, humidity: f64, wind: f64, precip: f64, ndvi: f64, elevation: f64) -> RiskInputs {
        RiskInputs {
            temperature_f: temp,
            humidity_pct: humidity,
            wind_mph: wind,
            precipitation_in: precip,
            ndvi,
            elevation_m: elevation,
        }
    }

    #[rstest]
    #[case(inputs(75.0, 40.0, 10.0, 0.0, 0.5, 300.0), 37.5, 37.5, Tier::Moderate)]
    #[case(inputs(100.0, 10.0, 20.0, 0.0, 0.8, 1000.0), 76.0, 76.0, Tier::Extreme)]
    #[case(inputs(60.0, 90.0, 0.0, 0.5, 0.2, 0.0), -5.5, 0.0, Tier::Low)]
    fn test_worked_examples(
        #[case] inputs: RiskInputs,
        #[case] expected_raw: f64,
        #[case] expected_score: f64,
        #[case] expected_tier: Tier,
    ) {
        assert!((raw_score(&inputs) - expected_raw).abs() < 1e-9);
        let score = risk_score(&inputs);
        assert!((score - expected_score).abs() < 1e-9);
        assert_eq!(classify(score), expected_tier);
    }

    #[rstest]
    #[case(0.0, Tier::Low)]
    #[case(24.999, Tier::Low)]
    #[case(25.0, Tier::Moderate)]
    #[case(49.999, Tier::Moderate)]
    #[case(50.0, Tier::High)]
    #[case(74.999, Tier::High)]
    #[case(75.0, Tier::Extreme)]
    #[case(100.0, Tier::Extreme)]
    fn test_tier_boundaries(#[case] score: f64, #[case] expected: Tier) {
        assert_eq!(classify(score), expected);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut previous = Tier::Low;
        for step in 0..=10_000 {
            let tier = classify(f64::from(step) / 100.0);
            assert!(tier >= previous);
            previous = tier;
        }
        assert_eq!(previous, Tier::Extreme);
    }

    #[test]
    fn test_score_bounded_for_extreme_inputs() {
        let values = [-1e12, -500.0, -1.0, 0.0, 0.5, 1.0, 50.0, 500.0, 1e12];
        for &a in &values {
            for &b in &values {
                let score = risk_score(&inputs(a, b, a, b, a, b));
                assert!((MIN_SCORE..=MAX_SCORE).contains(&score), "score {score} for {a}, {b}");
            }
        }
    }

    #[test]
    fn test_non_finite_raw_scores_clamp() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 100.0);
        assert_eq!(clamp_score(f64::NEG_INFINITY), 0.0);
        assert_eq!(classify(f64::NAN), Tier::Low);
    }

    #[test]
    fn test_assess_applies_weather_defaults() {
        let day = WeatherDay {
            date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            temperature_f: None,
            humidity_pct: None,
            wind_speed_mph: None,
            precipitation_in: None,
            conditions: None,
            icon: None,
            synthetic: false,
        };
        let profile = EnvironmentalProfile {
            ndvi: f64::NAN,
            elevation_m: -20.0,
            class: RegionClass::Other,
        };

        // 21 - 10 + 7.5 - 0 + 5 + 0
        let score = assess(&day, &profile);
        assert!((score.value - 23.5).abs() < 1e-9);
        assert_eq!(score.tier, Tier::Low);
        assert_eq!(score.color, "#4CAF50");
    }
}
