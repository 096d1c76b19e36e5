//! Error types for Cellar core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages. Nothing is retried or swallowed.

use thiserror::Error;

/// Result type alias for Cellar operations.
pub type Result<T> = std::result::Result<T, CellarError>;

/// Core error type for Cellar operations.
#[derive(Debug, Error)]
pub enum CellarError {
    /// Referenced id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Position already occupied by another wine
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation not valid for the entity's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Database unreachable or cannot be opened
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid user input or zone configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for CellarError {
    fn from(err: std::io::Error) -> Self {
        CellarError::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for CellarError {
    fn from(err: serde_json::Error) -> Self {
        CellarError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CellarError::Conflict("position A-1 is occupied".to_string());
        assert_eq!(err.to_string(), "Conflict: position A-1 is occupied");

        let err = CellarError::NotFound("wine wine_0000".to_string());
        assert_eq!(err.to_string(), "Not found: wine wine_0000");
    }

    #[test]
    fn test_io_error_maps_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CellarError = io.into();
        assert!(matches!(err, CellarError::Connection(_)));
    }
}
