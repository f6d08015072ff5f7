//! Multi-day weather series per region token.
//!
//! Upstream failures never reach the caller: a failing, slow or empty
//! provider response is replaced by a reproducible synthetic series, and
//! whichever series was produced is cached for the configured TTL.

pub mod synthetic;
pub mod visual_crossing;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::cache::{Cache, CacheKey};
use crate::config::WeatherConfig;
use crate::models::WeatherDay;
use crate::Result;

pub use visual_crossing::VisualCrossingClient;

pub const DEFAULT_HORIZON_DAYS: usize = 7;

/// Upstream daily forecast provider
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Up to `horizon_days` days starting today, in chronological order
    async fn fetch_days(&self, token: &str, horizon_days: usize) -> Result<Vec<WeatherDay>>;

    fn name(&self) -> &'static str;
}

/// Cache-backed weather series with synthetic fallback
#[derive(Clone)]
pub struct WeatherSource {
    provider: Arc<dyn WeatherProvider>,
    cache: Cache,
    ttl: Duration,
    timeout: Duration,
    as_of: Option<NaiveDate>,
}

impl std::fmt::Debug for WeatherSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSource")
            .field("provider", &self.provider.name())
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("as_of", &self.as_of)
            .finish()
    }
}

impl WeatherSource {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>, cache: Cache, timeout: Duration) -> Self {
        let ttl = cache.default_ttl();
        Self {
            provider,
            cache,
            ttl,
            timeout,
            as_of: None,
        }
    }

    /// Source backed by the Visual Crossing client
    pub fn from_config(config: &WeatherConfig, cache: Cache) -> Result<Self> {
        let client = VisualCrossingClient::new(config)?;
        Ok(Self::new(Arc::new(client), cache, config.timeout()))
    }

    /// Pins "today" to a fixed date; synthetic series and cache keys use it.
    #[must_use]
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Weather for `token` over `horizon_days` days (at least one).
    /// Always returns a non-empty series.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch(&self, token: &str, horizon_days: usize) -> Vec<WeatherDay> {
        let horizon = horizon_days.max(1);
        let today = self.today();
        let key = CacheKey::new("weather_series", format!("{token}/{horizon}/{today}"));

        let cached = self
            .cache
            .get_or_compute(&key, self.ttl, || async {
                Ok(self.fetch_uncached(token, horizon, today).await)
            })
            .await;

        match cached {
            Ok(mut days) => {
                days.truncate(horizon);
                days
            }
            Err(err) => {
                error!("Weather cache failure for {key}: {err}");
                self.fetch_uncached(token, horizon, today).await
            }
        }
    }

    async fn fetch_uncached(&self, token: &str, horizon: usize, today: NaiveDate) -> Vec<WeatherDay> {
        let outcome = tokio::time::timeout(self.timeout, self.provider.fetch_days(token, horizon)).await;

        let reason = match outcome {
            Ok(Ok(days)) if !days.is_empty() => {
                debug!("Upstream returned {} days", days.len());
                return days;
            }
            Ok(Ok(_)) => "empty response".to_string(),
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("timed out after {:?}", self.timeout),
        };

        warn!("Weather upstream unavailable for '{token}' ({reason}), using synthetic series");
        let days = synthetic::series(token, today, horizon);
        info!("Generated {} synthetic days for '{token}'", days.len());
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FireRiskError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
    }

    fn real_day(date: NaiveDate) -> WeatherDay {
        WeatherDay {
            date,
            temperature_f: Some(91.0),
            humidity_pct: Some(12.0),
            wind_speed_mph: Some(18.0),
            precipitation_in: Some(0.0),
            conditions: Some("Clear".to_string()),
            icon: Some("clear-day".to_string()),
            synthetic: false,
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn fetch_days(&self, _token: &str, _horizon_days: usize) -> Result<Vec<WeatherDay>> {
            Err(FireRiskError::upstream("503 Service Unavailable"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl WeatherProvider for SlowProvider {
        async fn fetch_days(&self, _token: &str, horizon_days: usize) -> Result<Vec<WeatherDay>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(today().iter_days().take(horizon_days).map(real_day).collect())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl WeatherProvider for EmptyProvider {
        async fn fetch_days(&self, _token: &str, _horizon_days: usize) -> Result<Vec<WeatherDay>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "empty"
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn fetch_days(&self, _token: &str, horizon_days: usize) -> Result<Vec<WeatherDay>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Upstream sends more than asked for
            Ok(today().iter_days().take(horizon_days + 3).map(real_day).collect())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn source(provider: Arc<dyn WeatherProvider>) -> WeatherSource {
        WeatherSource::new(provider, Cache::default(), Duration::from_secs(5)).with_as_of(today())
    }

    #[tokio::test]
    async fn test_upstream_failure_falls_back_to_synthetic() {
        let days = source(Arc::new(FailingProvider)).fetch("losangeles", 7).await;
        assert_eq!(days.len(), 7);
        assert!(days.iter().all(|d| d.synthetic));
        assert_eq!(days[0].date, today());
        assert_eq!(days, synthetic::series("losangeles", today(), 7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_synthetic() {
        let days = source(Arc::new(SlowProvider)).fetch("fresno", 3).await;
        assert_eq!(days.len(), 3);
        assert!(days.iter().all(|d| d.synthetic));
    }

    #[tokio::test]
    async fn test_empty_response_falls_back_to_synthetic() {
        let days = source(Arc::new(EmptyProvider)).fetch("mono", 5).await;
        assert_eq!(days.len(), 5);
        assert!(days[0].synthetic);
    }

    #[tokio::test]
    async fn test_fallback_is_reproducible_across_sources() {
        let a = source(Arc::new(FailingProvider)).fetch("california", 7).await;
        let b = source(Arc::new(FailingProvider)).fetch("california", 7).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_results_are_cached_and_truncated() {
        let provider = Arc::new(CountingProvider::default());
        let source = source(provider.clone());

        let first = source.fetch("sandiego", 7).await;
        let second = source.fetch("sandiego", 7).await;

        assert_eq!(first.len(), 7);
        assert_eq!(first, second);
        assert!(!first[0].synthetic);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        // A different horizon is a different key
        let short = source.fetch("sandiego", 2).await;
        assert_eq!(short.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_horizon_yields_one_day() {
        let days = source(Arc::new(FailingProvider)).fetch("fresno", 0).await;
        assert_eq!(days.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_series_refetched() {
        let provider = Arc::new(CountingProvider::default());
        let source = source(provider.clone()).with_ttl(Duration::from_secs(10));

        source.fetch("alameda", 7).await;
        tokio::time::advance(Duration::from_secs(11)).await;
        source.fetch("alameda", 7).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
