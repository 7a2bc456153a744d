//! Configuration error module.
//!
//! Errors raised while layering, deserializing, validating or writing the
//! Nalu Link configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when the configuration file is missing.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file extension does not map to a known format.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Error when parsing the layered configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Error when validating the configuration.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error when a configuration value is out of the valid range.
    #[error("Configuration value {key} is out of valid range: {message}")]
    ValueOutOfRange {
        /// The key of the invalid value
        key: String,
        /// Description of the valid range
        message: String,
    },

    /// The configuration could not be rendered for writing.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),
}

impl ConfigError {
    /// Builds a [`ConfigError::ValueOutOfRange`].
    pub fn out_of_range<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ValueOutOfRange {
            key: key.into(),
            message: message.into(),
        }
    }
}
