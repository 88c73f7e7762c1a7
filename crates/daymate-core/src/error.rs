//! Core error types for daymate-core.
//!
//! This module defines the error hierarchy using thiserror. Backend
//! failures are recoverable by design: the chat layer converts them into a
//! fallback reply, so callers normally only see them from the raw client.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daymate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Alarm lookup and parsing errors
    #[error("Alarm error: {0}")]
    Alarm(#[from] AlarmError),

    /// Chat backend errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home or data directory unavailable
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Alarm-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlarmError {
    /// Time string is not a valid 24h `HH:MM`
    #[error("Invalid alarm time '{value}': expected HH:MM (00:00-23:59)")]
    InvalidTime { value: String },

    #[error("Invalid weekday '{0}': expected one of Mon, Tue, Wed, Thu, Fri, Sat, Sun")]
    InvalidDay(String),

    #[error("Unknown alarm sound '{0}'")]
    InvalidSound(String),

    #[error("Alarm '{0}' not found")]
    NotFound(String),
}

/// Errors talking to the chat backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Base URL plus endpoint did not form a valid URL
    #[error("Invalid backend URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, timeout or body decoding failure
    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
