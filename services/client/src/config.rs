//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development. Nothing here is hardcoded:
//! the backend base URL, the anonymous API key, and the upload-proxy
//! endpoint and shared secret all come from the environment.

use tracing::Level;
use url::Url;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the hosted backend, e.g. `https://abc.example.co`.
    pub backend_url: Url,
    /// The anonymous API key sent with every backend request.
    pub anon_key: String,
    /// Endpoint of the file-upload proxy.
    pub upload_url: Url,
    /// Shared bearer secret the upload proxy expects.
    pub upload_secret: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure
    /// tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let backend_url = required_url("SPOTTER_BACKEND_URL")?;
        let anon_key = std::env::var("SPOTTER_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("SPOTTER_ANON_KEY".to_string()))?;

        let upload_url = required_url("SPOTTER_UPLOAD_URL")?;
        let upload_secret = std::env::var("SPOTTER_UPLOAD_SECRET")
            .map_err(|_| ConfigError::MissingVar("SPOTTER_UPLOAD_SECRET".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            backend_url,
            anon_key,
            upload_url,
            upload_secret,
            log_level,
        })
    }
}

fn required_url(name: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))?;
    raw.parse::<Url>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_urls() {
        let result = "not a url".parse::<Url>();
        assert!(result.is_err());
    }

    #[test]
    fn config_is_cloneable_for_shared_ownership() {
        let config = Config {
            backend_url: "https://backend.example.co".parse().unwrap(),
            anon_key: "anon".into(),
            upload_url: "https://uploads.example.co".parse().unwrap(),
            upload_secret: "secret".into(),
            log_level: Level::INFO,
        };
        let copy = config.clone();
        assert_eq!(copy.anon_key, config.anon_key);
    }
}
