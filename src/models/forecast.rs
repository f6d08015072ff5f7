//! Forecast series: one risk score per day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RiskScore, WeatherDay};

/// Risk for a single forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRisk {
    pub date: NaiveDate,
    pub score: RiskScore,
    /// Weather the score was computed from
    pub weather: WeatherDay,
}

/// Ordered daily risk for a region or a region-set aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Region or region-set name
    pub subject: String,
    /// Days in chronological order, first is the current day
    pub days: Vec<DailyRisk>,
}

impl ForecastSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Risk on a given date, if it is part of the series
    #[must_use]
    pub fn on(&self, date: NaiveDate) -> Option<&DailyRisk> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Highest-scoring day
    #[must_use]
    pub fn peak(&self) -> Option<&DailyRisk> {
        self.days
            .iter()
            .max_by(|a, b| a.score.value.total_cmp(&b.score.value))
    }
}
