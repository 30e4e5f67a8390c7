//! Error types for the folio engine
//!
//! The disclosure engine itself never fails: missing elements are inert and
//! stale corrections are dropped. Errors only surface from the edges that
//! touch files and user-authored input (configuration, scenarios).

use std::path::PathBuf;
use thiserror::Error;

/// Result type for folio operations
pub type FolioResult<T> = Result<T, FolioError>;

/// Errors raised while loading configuration or replaying scenarios
#[derive(Error, Debug)]
pub enum FolioError {
    /// IO errors while reading config or scenario files
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Scenario definition errors
    #[error("Scenario error: {message}")]
    Scenario { message: String },

    /// A scenario expectation did not hold
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl FolioError {
    /// Create an IO error bound to the path being read
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a scenario error
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::Scenario {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
