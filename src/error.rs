//! Error types for scene composition and rendering.

use thiserror::Error;

use crate::composer::EntryId;
use crate::types::AttrKind;

/// Errors raised while building or rendering a scene.
#[derive(Debug, Error)]
pub enum SnipError {
    /// The shape does not declare this attribute.
    #[error("shape '{shape}' has no attribute '{key}'")]
    UnknownAttribute { shape: String, key: String },

    /// The value does not match the declared attribute kind.
    #[error("invalid value for '{shape}.{key}' (expected {expected}): {reason}")]
    InvalidAttribute {
        shape: String,
        key: String,
        expected: AttrKind,
        reason: String,
    },

    /// No built-in shape with this name.
    #[error("unknown shape '{0}'")]
    UnknownShape(String),

    /// The entry id does not belong to this composer.
    #[error("no scene entry with id {0}")]
    UnknownEntry(EntryId),

    /// `update` was called before `display`.
    #[error("display() must be called before update()")]
    NotDisplayed,

    /// Geometry that cannot be drawn (points at infinity, zero-length arrows).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Structurally invalid scene description.
    #[error("invalid scene: {0}")]
    Scene(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SnipError>;
