//! Error types for host access.

use thiserror::Error;

/// Library of host data a name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Scene object (model, armature).
    Object,
    /// Motion clip (host action).
    Clip,
    /// Keyframe curve attached to an object.
    Curve,
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object => f.write_str("object"),
            Self::Clip => f.write_str("clip"),
            Self::Curve => f.write_str("curve"),
        }
    }
}

/// Errors that can occur while reading or writing host data.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Named host data does not exist.
    #[error("nothing named '{name}' found in {searched}")]
    NotFound {
        /// The name that was looked up.
        name: String,
        /// Libraries that were searched.
        searched: String,
    },

    /// Clip has no keys for the requested bone.
    #[error("clip '{clip}' has no channel for bone '{bone}'")]
    MissingChannel {
        /// Clip name.
        clip: String,
        /// Bone name.
        bone: String,
    },

    /// Clip needs a first and a last keyframe.
    #[error("clip '{clip}' has {count} keyframe(s), need at least 2")]
    TooFewKeyframes {
        /// Clip name.
        clip: String,
        /// Number of distinct keyed frames.
        count: usize,
    },

    /// World matrix cannot be split into location, rotation and scale.
    #[error("degenerate world matrix for object '{0}'")]
    DegenerateMatrix(String),

    /// Scene document could not be decoded or encoded.
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    /// Create a not-found error for a single library.
    pub fn not_found(kind: DataKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            searched: format!("{kind}s"),
        }
    }

    /// Create a not-found error after searching every library.
    pub fn not_found_anywhere(name: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            searched: "objects, clips, curves".to_string(),
        }
    }

    /// Create a missing channel error.
    pub fn missing_channel(clip: impl Into<String>, bone: impl Into<String>) -> Self {
        Self::MissingChannel {
            clip: clip.into(),
            bone: bone.into(),
        }
    }
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, SceneError>;
