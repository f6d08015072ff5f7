//! Synthetic weather used when the upstream service is unavailable.
//!
//! Series are seeded from (location token, start date): the same location on
//! the same day always yields the same series, across restarts included.

use chrono::NaiveDate;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::models::{Condition, WeatherDay};
use crate::seed::{WEATHER_SALT, seeded_rng};

/// `days` synthetic days starting at `start`
#[must_use]
pub fn series(token: &str, start: NaiveDate, days: usize) -> Vec<WeatherDay> {
    let mut rng = seeded_rng(WEATHER_SALT, &format!("{token}|{start}"));
    start
        .iter_days()
        .take(days)
        .map(|date| synthetic_day(&mut rng, date))
        .collect()
}

fn synthetic_day(rng: &mut StdRng, date: NaiveDate) -> WeatherDay {
    let temperature = 70 + rng.random_range(-10..10);
    let humidity = 50 + rng.random_range(-20..20);
    let wind = 5 + rng.random_range(0..15);
    // Hundredths, truncated so the value stays below 0.5
    let precipitation = (rng.random::<f64>() * 0.5 * 100.0).floor() / 100.0;
    let condition = Condition::ALL[rng.random_range(0..Condition::ALL.len())];

    WeatherDay {
        date,
        temperature_f: Some(f64::from(temperature)),
        humidity_pct: Some(f64::from(humidity)),
        wind_speed_mph: Some(f64::from(wind)),
        precipitation_in: Some(precipitation),
        conditions: Some(condition.label().to_string()),
        icon: Some(condition.icon().to_string()),
        synthetic: true,
    }
}
