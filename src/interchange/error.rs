//! Error types for interchange operations.

use thiserror::Error;

/// Errors that can occur while exporting a model.
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No format is registered for the extension.
    #[error("Unsupported format: {0}")]
    Unsupported(String),
}
