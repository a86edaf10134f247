//! Centralized error types for texcite.

use thiserror::Error;

/// Main error type for texcite operations.
///
/// Per-file problems never surface through this type during a project
/// analysis; they are recorded on the report instead.
#[derive(Error, Debug)]
pub enum TexciteError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for texcite operations.
pub type TexciteResult<T> = Result<T, TexciteError>;

impl TexciteError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a catalog error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}
