//! Error types for Witness Core.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias for Witness operations
pub type WitnessResult<T> = Result<T, WitnessError>;

/// Main error type for Witness operations
#[derive(Error, Debug)]
pub enum WitnessError {
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Audio asset missing: {0}")]
    AssetMissing(String),

    #[error("Audio engine error: {0}")]
    AudioEngine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl WitnessError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WitnessError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        WitnessError::Storage(message.into())
    }

    /// Create a new audio engine error
    pub fn engine(message: impl Into<String>) -> Self {
        WitnessError::AudioEngine(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = WitnessError::validation("date", "Month must be between 01-12");
        assert_eq!(
            err.to_string(),
            "Validation error in date: Month must be between 01-12"
        );
    }

    #[test]
    fn test_witness_error_validation() {
        let err = WitnessError::validation("field", "message");
        assert!(matches!(err, WitnessError::Validation { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WitnessError = io.into();
        assert!(matches!(err, WitnessError::Io(_)));
    }
}
