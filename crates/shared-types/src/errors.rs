//! Common error types used across the Chart Studies crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all Chart Studies operations
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ChartStudiesError {
    #[error("Unknown overlay kind: {kind}")]
    UnknownKind { kind: String },

    #[error("Overlay has {actual} points but its kind requires {expected}")]
    PointArity { expected: usize, actual: usize },

    #[error("Reconstruction data missing for overlay {id}")]
    MissingReconstruction { id: String },

    #[error("Invalid timeframe duration: {duration_ms} ms")]
    InvalidTimeframe { duration_ms: u64 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for Chart Studies operations
pub type ChartStudiesResult<T> = Result<T, ChartStudiesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ChartStudiesError::InvalidTimeframe { duration_ms: 0 };

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidTimeframe"));

        let back: ChartStudiesError = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            ChartStudiesError::InvalidTimeframe { duration_ms: 0 }
        ));
    }

    #[test]
    fn test_error_display() {
        let error = ChartStudiesError::UnknownKind {
            kind: "pitchfork".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown overlay kind: pitchfork");
    }
}
