//! Risk aggregation over regions, region sets and forecast days.
//!
//! The pure helpers (`point_on_day`, `mean_score`, `select_day`) carry the
//! arithmetic; [`Aggregator`] wires them to the cached weather and
//! environmental sources.

use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::environment::EnvironmentalSource;
use crate::models::{
    DailyRisk, EnvironmentalProfile, ForecastSeries, Region, RegionSet, RiskScore, WeatherDay,
};
use crate::risk::{assess, to_risk_score};
use crate::weather::{DEFAULT_HORIZON_DAYS, WeatherSource};

/// Forecast series never extend past this many days
pub const MAX_FORECAST_DAYS: usize = 7;

/// What a risk query is about: one region or a whole set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    Region(Region),
    Set(RegionSet),
}

impl Selection {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Selection::Region(region) => &region.name,
            Selection::Set(set) => &set.name,
        }
    }

    #[must_use]
    pub fn weather_token(&self) -> String {
        match self {
            Selection::Region(region) => region.weather_token(),
            Selection::Set(set) => set.weather_token.clone(),
        }
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        match self {
            Selection::Region(region) => std::slice::from_ref(region),
            Selection::Set(set) => &set.regions,
        }
    }
}

/// Score for one region on one day
#[must_use]
pub fn point_on_day(day: &WeatherDay, profile: &EnvironmentalProfile) -> RiskScore {
    assess(day, profile)
}

/// Unweighted mean; `None` for no scores
#[must_use]
pub fn mean_score(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = scores.len() as f64;
    Some(scores.iter().sum::<f64>() / count)
}

/// Mean of each profile scored against the shared day, re-classified
#[must_use]
pub fn set_mean_on_day(day: &WeatherDay, profiles: &[EnvironmentalProfile]) -> Option<RiskScore> {
    let scores: Vec<f64> = profiles
        .iter()
        .map(|profile| point_on_day(day, profile).value)
        .collect();
    mean_score(&scores).map(to_risk_score)
}

/// Day matching `target`, counted from the first day and clamped to the series
#[must_use]
pub fn select_day(days: &[WeatherDay], target: NaiveDate) -> Option<&WeatherDay> {
    let first = days.first()?;
    let offset = (target - first.date).num_days();
    let last = days.len() - 1;
    let index = usize::try_from(offset).map_or(0, |offset| offset.min(last));
    days.get(index)
}

/// Composes the risk model over regions, sets and days
#[derive(Debug, Clone)]
pub struct Aggregator {
    weather: WeatherSource,
    environment: EnvironmentalSource,
    horizon_days: usize,
}

impl Aggregator {
    #[must_use]
    pub fn new(weather: WeatherSource, environment: EnvironmentalSource) -> Self {
        Self {
            weather,
            environment,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon_days: usize) -> Self {
        self.horizon_days = horizon_days.max(1);
        self
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherSource {
        &self.weather
    }

    #[must_use]
    pub fn environment(&self) -> &EnvironmentalSource {
        &self.environment
    }

    #[must_use]
    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Current day of the underlying weather source
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.weather.today()
    }

    /// Weather series backing `selection`
    pub async fn weather_for(&self, selection: &Selection) -> Vec<WeatherDay> {
        self.weather
            .fetch(&selection.weather_token(), self.horizon_days)
            .await
    }

    /// Profiles of all regions in `selection`, in member order
    pub async fn profiles(&self, selection: &Selection) -> Vec<EnvironmentalProfile> {
        join_all(
            selection
                .regions()
                .iter()
                .map(|region| self.environment.profile(region)),
        )
        .await
    }

    /// Risk of one region on `date`
    #[instrument(skip(self), fields(region = %region.name))]
    pub async fn point(&self, region: &Region, date: NaiveDate) -> DailyRisk {
        self.risk(&Selection::Region(region.clone()), date).await
    }

    /// Mean risk of a region set on `date`
    #[instrument(skip(self), fields(set = %set.name, members = set.len()))]
    pub async fn region_set_mean(&self, set: &RegionSet, date: NaiveDate) -> DailyRisk {
        self.risk(&Selection::Set(set.clone()), date).await
    }

    /// Risk of `selection` on `date`, or the nearest available day
    pub async fn risk(&self, selection: &Selection, date: NaiveDate) -> DailyRisk {
        let (days, profiles) = tokio::join!(self.weather_for(selection), self.profiles(selection));
        let day = select_day(&days, date)
            .cloned()
            .unwrap_or_else(|| WeatherDay::unknown(date));
        score_day(&day, &profiles).unwrap_or_else(|| DailyRisk {
            date: day.date,
            score: point_on_day(&day, &EnvironmentalProfile::default()),
            weather: day.clone(),
        })
    }

    /// Per-day risk over the first `min(7, horizon, available)` days
    #[instrument(skip(self), fields(selection = selection.name()))]
    pub async fn forecast(&self, selection: &Selection) -> ForecastSeries {
        let (days, profiles) = tokio::join!(self.weather_for(selection), self.profiles(selection));
        let count = MAX_FORECAST_DAYS.min(self.horizon_days).min(days.len());

        let series: Vec<DailyRisk> = days
            .iter()
            .take(count)
            .filter_map(|day| score_day(day, &profiles))
            .collect();
        debug!("Forecast has {} days", series.len());

        ForecastSeries {
            subject: selection.name().to_string(),
            days: series,
        }
    }

    /// Forecast for a single region
    pub async fn forecast_region(&self, region: &Region) -> ForecastSeries {
        self.forecast(&Selection::Region(region.clone())).await
    }

    /// Forecast of the set mean
    pub async fn forecast_set(&self, set: &RegionSet) -> ForecastSeries {
        self.forecast(&Selection::Set(set.clone())).await
    }
}

fn score_day(day: &WeatherDay, profiles: &[EnvironmentalProfile]) -> Option<DailyRisk> {
    let score = match profiles {
        [profile] => point_on_day(day, profile),
        _ => set_mean_on_day(day, profiles)?,
    };
    Some(DailyRisk {
        date: day.date,
        score,
        weather: day.clone(),
    })
}
