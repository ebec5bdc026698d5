//! services/client/src/error.rs
//!
//! Defines the construction-time error type for the client crate.
//!
//! Note the split: `ClientError` covers failures while wiring the layer up
//! (bad config, HTTP client construction); once constructed, every service
//! operation fails with `spotter_core::AppError` instead.

use crate::config::ConfigError;

/// Errors raised while constructing the service container.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a failure to construct the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
