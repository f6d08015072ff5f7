//! Configuration management for the `FireRisk` engine
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `FIRERISK_*` environment variables. The result is validated
//! before use.

use crate::FireRiskError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `FireRisk` engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireRiskConfig {
    /// Upstream weather service configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Presentation toggles passed to the dashboard builder
    #[serde(default)]
    pub display: DisplayOptions,
    /// Region catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Weather service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Timeline API key. Without one every fetch uses synthetic data.
    pub api_key: Option<String>,
    /// Base URL of the timeline endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Number of forecast days requested per region
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Upstream unit group; scoring expects US units
    #[serde(default = "default_unit_group")]
    pub unit_group: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Display toggles. Threaded explicitly into the dashboard builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Include simulated historical fire markers
    #[serde(default = "default_true")]
    pub show_historical_fires: bool,
    /// Include per-region NDVI values in the map layer
    #[serde(default)]
    pub show_ndvi_layer: bool,
}

/// Region catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON catalog file; the built-in California catalog is used otherwise
    pub path: Option<String>,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline"
        .to_string()
}

fn default_weather_timeout() -> u32 {
    5
}

fn default_horizon_days() -> u32 {
    7
}

fn default_unit_group() -> String {
    "us".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            horizon_days: default_horizon_days(),
            unit_group: default_unit_group(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_historical_fires: true,
            show_ndvi_layer: false,
        }
    }
}

impl Default for FireRiskConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
            display: DisplayOptions::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl WeatherConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl CacheConfig {
    /// Entry TTL as a [`Duration`]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl FireRiskConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load from `config_path`, or the default location when `None`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // FIRERISK_WEATHER__API_KEY, FIRERISK_CACHE__TTL_SECONDS, ...
        builder = builder.add_source(
            Environment::with_prefix("FIRERISK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FireRiskConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("firerisk").join("config.toml"))
    }

    /// Replaces zero/empty values left by partial sources with defaults
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.horizon_days == 0 {
            self.weather.horizon_days = default_horizon_days();
        }
        if self.weather.unit_group.is_empty() {
            self.weather.unit_group = default_unit_group();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// A configured key must look like a Visual Crossing key; no key is fine
    pub fn validate_api_key(&self) -> Result<()> {
        let Some(api_key) = self.weather.api_key.as_deref() else {
            return Ok(());
        };

        let problem = match api_key.len() {
            0 => "is empty (remove it to run on synthetic weather)",
            1..8 => "is too short",
            101.. => "is too long",
            _ => return Ok(()),
        };
        Err(FireRiskError::config(format!("Weather API key {problem}")).into())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 60 {
            return Err(FireRiskError::config(
                "Weather API timeout cannot exceed 60 seconds"
            ).into());
        }

        if self.weather.horizon_days > 15 {
            return Err(FireRiskError::config(
                "Forecast horizon cannot exceed 15 days"
            ).into());
        }

        if self.cache.ttl_seconds > 7 * 24 * 3600 {
            return Err(FireRiskError::config(
                "Cache TTL cannot exceed 604800 seconds (1 week)"
            ).into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FireRiskError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FireRiskError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if self.weather.unit_group != "us" {
            return Err(FireRiskError::config(
                "Weather unit group must be 'us' (risk scoring expects °F, mph and inches)"
            ).into());
        }

        if !self.weather.base_url.starts_with("http://") && !self.weather.base_url.starts_with("https://") {
            return Err(FireRiskError::config(
                format!("Weather base URL '{}' is not an http(s) URL", self.weather.base_url)
            ).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FireRiskConfig::default();
        assert!(config.weather.base_url.contains("visualcrossing"));
        assert_eq!(config.weather.timeout_seconds, 5);
        assert_eq!(config.weather.horizon_days, 7);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.logging.level, "info");
        assert!(config.display.show_historical_fires);
        assert!(!config.display.show_ndvi_layer);
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = FireRiskConfig::default();
        config.weather.api_key = Some("short".to_string());
        let result = config.validate_api_key();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = FireRiskConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = FireRiskConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_metric_units_rejected() {
        let mut config = FireRiskConfig::default();
        config.weather.unit_group = "metric".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = FireRiskConfig::default();
        config.weather.timeout_seconds = 0;
        config.cache.ttl_seconds = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.weather.timeout_seconds, 5);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("firerisk-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[weather]\ntimeout_seconds = 3\n\n[display]\nshow_historical_fires = false\n",
        )
        .unwrap();

        let config = FireRiskConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.weather.timeout_seconds, 3);
        assert_eq!(config.weather.horizon_days, 7);
        assert!(!config.display.show_historical_fires);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = FireRiskConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("firerisk"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
