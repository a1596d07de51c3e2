//! Error types and exit codes for apidup
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, serialization, embedding provider)
//! - 2: Usage error (bad flags/args, invalid configuration)
//! - 3: Data error (missing catalog, unknown spec id, malformed catalog)

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args or configuration (2)
    Usage = 2,
    /// Data error - missing or malformed catalog, unknown id (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during apidup operations
#[derive(Error, Debug)]
pub enum ApidupError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("--format may only be specified once")]
    DuplicateFormat,

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {name}: {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { name: String, value: f64 },

    #[error("invalid cluster count: {k} (must be at least 1 for {items} item(s))")]
    InvalidClusterCount { k: usize, items: usize },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("spec not found: {id}")]
    SpecNotFound { id: String },

    #[error("catalog not found: {path:?}")]
    CatalogNotFound { path: PathBuf },

    #[error("invalid catalog {path:?}: {reason}")]
    InvalidCatalog { path: PathBuf, reason: String },

    #[error("duplicate spec id: {id}")]
    DuplicateId { id: String },

    // Generic failures (exit code 1)
    #[error("embedding provider failed for {text:?}: {reason}")]
    Embedding { text: String, reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl ApidupError {
    /// Create an error for a threshold outside `[0, 1]`
    pub fn invalid_threshold(name: &str, value: f64) -> Self {
        ApidupError::InvalidThreshold {
            name: name.to_string(),
            value,
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ApidupError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed embedding provider call
    pub fn embedding(text: &str, reason: impl std::fmt::Display) -> Self {
        ApidupError::Embedding {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ApidupError::UnknownFormat(_)
            | ApidupError::DuplicateFormat
            | ApidupError::UsageError(_)
            | ApidupError::InvalidThreshold { .. }
            | ApidupError::InvalidClusterCount { .. }
            | ApidupError::InvalidValue { .. } => ExitCode::Usage,

            ApidupError::SpecNotFound { .. }
            | ApidupError::CatalogNotFound { .. }
            | ApidupError::InvalidCatalog { .. }
            | ApidupError::DuplicateId { .. } => ExitCode::Data,

            ApidupError::Embedding { .. }
            | ApidupError::DimensionMismatch { .. }
            | ApidupError::Io(_)
            | ApidupError::Yaml(_)
            | ApidupError::Json(_)
            | ApidupError::Toml(_)
            | ApidupError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            ApidupError::UnknownFormat(_) => "unknown_format",
            ApidupError::DuplicateFormat => "duplicate_format",
            ApidupError::UsageError(_) => "usage_error",
            ApidupError::InvalidThreshold { .. } => "invalid_threshold",
            ApidupError::InvalidClusterCount { .. } => "invalid_cluster_count",
            ApidupError::InvalidValue { .. } => "invalid_value",
            ApidupError::SpecNotFound { .. } => "spec_not_found",
            ApidupError::CatalogNotFound { .. } => "catalog_not_found",
            ApidupError::InvalidCatalog { .. } => "invalid_catalog",
            ApidupError::DuplicateId { .. } => "duplicate_id",
            ApidupError::Embedding { .. } => "embedding_error",
            ApidupError::DimensionMismatch { .. } => "dimension_mismatch",
            ApidupError::Io(_) => "io_error",
            ApidupError::Yaml(_) => "yaml_error",
            ApidupError::Json(_) => "json_error",
            ApidupError::Toml(_) => "toml_error",
            ApidupError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for apidup operations
pub type Result<T> = std::result::Result<T, ApidupError>;
