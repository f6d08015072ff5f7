//! Error types and handling for the `FireRisk` engine

use thiserror::Error;

/// Main error type for the `FireRisk` engine
#[derive(Error, Debug)]
pub enum FireRiskError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream weather service could not deliver a usable forecast
    #[error("Upstream unavailable: {message}")]
    Upstream { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache encoding/decoding errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl FireRiskError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// True for failures that the weather source recovers from by
    /// substituting a synthetic series.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, FireRiskError::Upstream { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FireRiskError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            FireRiskError::Upstream { .. } => {
                "Weather service unavailable. Showing simulated conditions.".to_string()
            }
            FireRiskError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            FireRiskError::Cache { .. } => {
                "Cache operation failed. Restarting the service clears the cache.".to_string()
            }
            FireRiskError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            FireRiskError::General { message } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for FireRiskError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key
        FireRiskError::upstream(err.without_url().to_string())
    }
}

impl From<postcard::Error> for FireRiskError {
    fn from(err: postcard::Error) -> Self {
        FireRiskError::cache(err.to_string())
    }
}

impl From<serde_json::Error> for FireRiskError {
    fn from(err: serde_json::Error) -> Self {
        FireRiskError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = FireRiskError::config("missing API key");
        assert!(matches!(config_err, FireRiskError::Config { .. }));

        let upstream_err = FireRiskError::upstream("connection refused");
        assert!(matches!(upstream_err, FireRiskError::Upstream { .. }));
        assert!(upstream_err.is_upstream());

        let validation_err = FireRiskError::validation("empty region set");
        assert!(matches!(validation_err, FireRiskError::Validation { .. }));
        assert!(!validation_err.is_upstream());
    }

    #[test]
    fn test_user_messages() {
        let config_err = FireRiskError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = FireRiskError::upstream("test");
        assert!(upstream_err.user_message().contains("simulated"));

        let validation_err = FireRiskError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FireRiskError = io_err.into();
        assert!(matches!(err, FireRiskError::Io { .. }));
    }

    #[test]
    fn test_json_error_is_validation() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: FireRiskError = json_err.into();
        assert!(matches!(err, FireRiskError::Validation { .. }));
    }
}
