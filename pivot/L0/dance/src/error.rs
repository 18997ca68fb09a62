//! Error types for choreography.

use pivot_scene::SceneError;
use pivot_types::TypesError;
use thiserror::Error;

/// Broad category of a [`DanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Named host data is absent.
    Lookup,
    /// A step request matches no clip.
    Resolution,
    /// A figure or config value is unusable.
    Configuration,
    /// A step file cannot be read or parsed.
    FileFormat,
}

/// Errors that can occur while resolving, placing or sequencing steps.
#[derive(Debug, Error)]
pub enum DanceError {
    /// Host lookup failed.
    #[error(transparent)]
    Lookup(#[from] SceneError),

    /// Step request could not be turned into a clip.
    #[error("no such step '{step}': {reason}")]
    Resolution {
        /// The requested step.
        step: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Figure cannot perform the request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid vocabulary or config value.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// Malformed step file.
    #[error("step file line {line}: {message}")]
    FileFormat {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },

    /// Step file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DanceError {
    /// Create a resolution error.
    pub fn resolution(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a file format error.
    pub fn file_format(line: usize, message: impl Into<String>) -> Self {
        Self::FileFormat {
            line,
            message: message.into(),
        }
    }

    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lookup(_) => ErrorKind::Lookup,
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::Configuration(_) | Self::Types(_) => ErrorKind::Configuration,
            Self::FileFormat { .. } | Self::Io(_) => ErrorKind::FileFormat,
        }
    }
}

/// Result type for choreography operations.
pub type Result<T> = std::result::Result<T, DanceError>;
