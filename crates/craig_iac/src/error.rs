//! Error types for code generation.

use thiserror::Error;

/// Result type alias for generation operations.
pub type CraigResult<T> = Result<T, CraigError>;

/// Errors that can occur while generating Terraform or CDKTF output.
#[derive(Error, Debug)]
pub enum CraigError {
    #[error("{from}: {kind} `{name}` is not declared in the configuration")]
    MissingReference {
        kind: &'static str,
        name: String,
        from: String,
    },

    #[error("{function}: invalid field `{field}`: {message}")]
    InvalidField {
        function: String,
        field: String,
        message: String,
    },

    #[error("Duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CraigError {
    /// Create a new missing reference error.
    pub fn missing(kind: &'static str, name: impl Into<String>, from: impl Into<String>) -> Self {
        CraigError::MissingReference {
            kind,
            name: name.into(),
            from: from.into(),
        }
    }

    /// Create a new invalid field error.
    pub fn invalid(
        function: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CraigError::InvalidField {
            function: function.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unwrap an optional field, failing with an `InvalidField` error naming the caller.
pub fn required<'a>(value: &'a Option<String>, function: &str, field: &str) -> CraigResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CraigError::invalid(function, field, "is required"))
}
