//! Unified error types for Waypost

use thiserror::Error;

/// Unified error type for all Waypost operations
#[derive(Error, Debug)]
pub enum WaypostError {
    // Suspension errors
    #[error("Suspension registration failed: {0}")]
    Registration(String),

    // Resume errors
    #[error("Resume input missing for key: {0}")]
    MissingResumeInput(String),

    #[error("Unexpected resume for activity: {0}")]
    UnexpectedResume(String),

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using WaypostError
pub type Result<T> = std::result::Result<T, WaypostError>;
