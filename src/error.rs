//! Error Module
//!
//! Defines error types and result types used throughout the log relay.

use thiserror::Error;

/// Main error type for the log relay
#[derive(Error, Debug, Clone)]
pub enum RelayError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Decompression error: {0}")]
    DecompressionError(String),

    #[error("Submission error: {0}")]
    SubmissionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RelayError {
    fn from(err: serde_yaml::Error) -> Self {
        RelayError::ConfigError(err.to_string())
    }
}

/// Result type alias for the log relay
pub type Result<T> = std::result::Result<T, RelayError>;
