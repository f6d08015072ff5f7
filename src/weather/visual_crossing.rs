//! Visual Crossing timeline API client
//!
//! `GET {base_url}/{location}?unitGroup=us&key={key}&contentType=json&include=days`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::models::WeatherDay;
use crate::{FireRiskError, Result};

/// Timeline response; only the daily block is requested
#[derive(Debug, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub days: Vec<TimelineDay>,
}

/// One day of the timeline response. Every measurement may be absent.
#[derive(Debug, Deserialize)]
pub struct TimelineDay {
    pub datetime: String,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub precip: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

impl TimelineDay {
    /// Converts to a [`WeatherDay`]; `None` when the date does not parse
    #[must_use]
    pub fn into_weather_day(self) -> Option<WeatherDay> {
        let date = NaiveDate::parse_from_str(&self.datetime, "%Y-%m-%d").ok()?;
        Some(WeatherDay {
            date,
            temperature_f: self.temp,
            humidity_pct: self.humidity,
            wind_speed_mph: self.windspeed,
            precipitation_in: self.precip,
            conditions: self.conditions,
            icon: self.icon,
            synthetic: false,
        })
    }
}

impl TimelineResponse {
    /// Days in upstream order, dropping entries with malformed dates
    #[must_use]
    pub fn into_weather_days(self) -> Vec<WeatherDay> {
        self.days
            .into_iter()
            .filter_map(|day| {
                let raw = day.datetime.clone();
                let parsed = day.into_weather_day();
                if parsed.is_none() {
                    warn!("Skipping upstream day with malformed date '{raw}'");
                }
                parsed
            })
            .collect()
    }
}

/// HTTP client for the timeline endpoint
#[derive(Debug, Clone)]
pub struct VisualCrossingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    unit_group: String,
}

impl VisualCrossingClient {
    /// Create a new client from configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("FireRisk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FireRiskError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            unit_group: config.unit_group.clone(),
        })
    }

    fn timeline_url(&self, token: &str, api_key: &str) -> String {
        format!(
            "{}/{}?unitGroup={}&key={}&contentType=json&include=days",
            self.base_url,
            urlencoding::encode(token),
            urlencoding::encode(&self.unit_group),
            urlencoding::encode(api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingClient {
    fn name(&self) -> &'static str {
        "visual-crossing"
    }

    #[instrument(skip(self), fields(provider = "visual-crossing"))]
    async fn fetch_days(&self, token: &str, horizon_days: usize) -> Result<Vec<WeatherDay>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FireRiskError::upstream("No weather API key configured"))?;

        let start_time = Instant::now();
        let url = self.timeline_url(token, api_key);
        debug!("Timeline request for '{}'", token);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FireRiskError::upstream(format!(
                "Timeline request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let timeline: TimelineResponse = response
            .json()
            .await
            .map_err(|e| FireRiskError::upstream(format!("Invalid timeline response: {}", e.without_url())))?;

        let mut days = timeline.into_weather_days();
        days.truncate(horizon_days);

        let elapsed = start_time.elapsed();
        info!(
            "Retrieved {} forecast days for '{}' in {:.3}s",
            days.len(),
            token,
            elapsed.as_secs_f64()
        );
        if elapsed > Duration::from_secs(3) {
            warn!("Slow timeline response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline_response() {
        let json = r#"{
            "resolvedAddress": "Los Angeles, CA, United States",
            "days": [
                {"datetime": "2024-08-15", "temp": 78.4, "humidity": 41.2, "windspeed": 11.0,
                 "precip": 0.0, "conditions": "Clear", "icon": "clear-day"},
                {"datetime": "2024-08-16", "temp": 80.1, "conditions": "Partly cloudy"},
                {"datetime": "not-a-date", "temp": 80.1}
            ]
        }"#;

        let response: TimelineResponse = serde_json::from_str(json).unwrap();
        let days = response.into_weather_days();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        assert_eq!(days[0].temperature_f, Some(78.4));
        assert_eq!(days[0].icon.as_deref(), Some("clear-day"));
        assert!(!days[0].synthetic);
        assert_eq!(days[1].humidity_pct, None);
        assert_eq!(days[1].humidity_or_default(), 50.0);
    }

    #[test]
    fn test_missing_days_block() {
        let response: TimelineResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_weather_days().is_empty());
    }

    #[test]
    fn test_timeline_url() {
        let config = WeatherConfig {
            api_key: Some("test_api_key".to_string()),
            base_url: "https://example.test/timeline/".to_string(),
            ..WeatherConfig::default()
        };
        let client = VisualCrossingClient::new(&config).unwrap();
        assert_eq!(
            client.timeline_url("san francisco", "test_api_key"),
            "https://example.test/timeline/san%20francisco?unitGroup=us&key=test_api_key&contentType=json&include=days"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream_error() {
        let client = VisualCrossingClient::new(&WeatherConfig::default()).unwrap();
        let err = client.fetch_days("fresno", 7).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        let config = WeatherConfig {
            api_key: Some("SECRET_KEY_123456".to_string()),
            base_url: "http://127.0.0.1:9/timeline".to_string(),
            timeout_seconds: 2,
            ..WeatherConfig::default()
        };
        let client = VisualCrossingClient::new(&config).unwrap();

        let err = client.fetch_days("fresno", 7).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(!err.to_string().contains("SECRET_KEY_123456"));
        assert!(!err.user_message().contains("SECRET_KEY_123456"));
    }
}
