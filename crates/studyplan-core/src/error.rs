//! Core error types for studyplan-core.
//!
//! Planning itself never fails on malformed input (bad numbers fall back to
//! defaults), so these errors cover the fallible edges: time parsing,
//! configuration files, and export.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not resolve or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Wall-clock time not in `HH:MM` form
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime { value: String },

    /// Subject spec not in `NAME:DIFFICULTY:URGENCY` form
    #[error("Invalid subject '{value}': expected NAME:DIFFICULTY:URGENCY")]
    InvalidSubject { value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<String> for CoreError {
    fn from(message: String) -> Self {
        CoreError::Custom(message)
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidTime {
            value: "25:99".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid time '25:99': expected HH:MM"
        );
    }

    #[test]
    fn config_error_message_names_the_key() {
        let err = ConfigError::UnknownKey("planner.nope".into());
        assert_eq!(err.to_string(), "Unknown configuration key: planner.nope");
    }
}
