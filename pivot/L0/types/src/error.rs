//! Error types for the pivot vocabulary crate.

use thiserror::Error;

/// Errors raised while parsing vocabulary or loading configuration.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Foot name was neither `L`/`left` nor `R`/`right`.
    #[error("unknown foot: '{0}' (expected L or R)")]
    UnknownFoot(String),

    /// Dancer nickname not recognized.
    #[error("unknown dancer: '{0}' (expected man or woman)")]
    UnknownDancer(String),

    /// Step-file dancer selector not recognized.
    #[error("unknown dancer selector: '{0}' (expected man, woman or both)")]
    UnknownSelector(String),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be decoded.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TypesError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for vocabulary and configuration operations.
pub type Result<T> = std::result::Result<T, TypesError>;
