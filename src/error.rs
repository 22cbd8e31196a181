//! Error types for the Hearthloop adaptation engine
//!
//! This module provides comprehensive error handling using thiserror for
//! structured error definitions and anyhow for error propagation.

use thiserror::Error;

/// Main error type for Hearthloop operations
#[derive(Error, Debug)]
pub enum HearthloopError {
    /// Missing identifier, unrecognized kind or malformed payload.
    /// Raised before any store call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Feedback store read or write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Hearthloop operations
pub type Result<T> = std::result::Result<T, HearthloopError>;

/// Convert anyhow::Error to HearthloopError
impl From<anyhow::Error> for HearthloopError {
    fn from(err: anyhow::Error) -> Self {
        HearthloopError::Other(err.to_string())
    }
}

impl From<libsql::Error> for HearthloopError {
    fn from(err: libsql::Error) -> Self {
        HearthloopError::Storage(err.to_string())
    }
}

impl HearthloopError {
    /// True for errors raised by input validation rather than a collaborator
    pub fn is_validation(&self) -> bool {
        matches!(self, HearthloopError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HearthloopError::Validation("user_id is required".to_string());
        assert_eq!(err.to_string(), "Validation error: user_id is required");

        let err = HearthloopError::Storage("connection refused".to_string());
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json");
        assert!(json_err.is_err());

        let err: HearthloopError = json_err.unwrap_err().into();
        assert!(matches!(err, HearthloopError::Serialization(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: HearthloopError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
