//! Error types for the configuration module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Configuration not found at path: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration format in file {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
