//! Error hierarchy for the I/O-facing layers.
//!
//! The scoring pipeline itself is total by design: malformed engine inputs
//! degrade through documented fallbacks instead of erroring. These types
//! cover the layers around it: input files, configuration, and export.

use std::path::Path;
use thiserror::Error;

/// Top-level error type for fitrank operations
#[derive(Debug, Error)]
pub enum FitrankError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FitrankError {
    pub fn configuration(path: &Path, reason: impl std::fmt::Display) -> Self {
        FitrankError::Configuration(format!("{}: {}", path.display(), reason))
    }
}

/// Result type alias for fitrank operations
pub type Result<T> = std::result::Result<T, FitrankError>;
