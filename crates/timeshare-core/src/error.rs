//! Core error types for timeshare-core.
//!
//! This module defines the error hierarchy using thiserror. The allocation
//! errors are the only ones the pure algorithms can raise; everything else
//! belongs to the ingestion, configuration and collaborator layers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeshare-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Weight/share validation errors
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Malformed input files
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External service errors
    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while turning weights into target shares.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// Every supplied score was zero, so no share can be derived.
    #[error("Invalid weights: scores sum to {total}, at least one activity needs a positive score")]
    InvalidWeights { total: u64 },

    /// A directly supplied share map is unusable.
    #[error("Invalid target share: {reason}")]
    InvalidTargetShare { reason: String },
}

impl AllocationError {
    pub(crate) fn share(reason: impl Into<String>) -> Self {
        AllocationError::InvalidTargetShare {
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading history, event and target files.
#[derive(Error, Debug)]
pub enum InputError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content does not have the expected shape
    #[error("Malformed input in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Time spent can never be negative
    #[error("Negative duration recorded for '{activity}'")]
    NegativeDuration { activity: String },

    /// A spreadsheet row carries a score that is not a non-negative integer
    #[error("Invalid score on line {line}: {message}")]
    InvalidScore { line: usize, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Errors from the time-tracking source, the task board and the keyring.
#[derive(Error, Debug)]
pub enum IntegrationError {
    /// Transport-level failure
    #[error("HTTP request to {service} failed: {source}")]
    Http {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status
    #[error("{service} API error (HTTP {status}): {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    /// No credentials stored for the service
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// A named remote resource does not exist
    #[error("{service}: {what} not found")]
    NotFound { service: String, what: String },

    /// Base URL could not be joined with an endpoint path
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// OS keyring failure
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl IntegrationError {
    pub(crate) fn http(service: &str, source: reqwest::Error) -> Self {
        IntegrationError::Http {
            service: service.to_string(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
