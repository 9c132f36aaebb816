//! Error types for story files and saves.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for story and save operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur while loading stories or handling saves.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A file is not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A character key is not a non-negative integer.
    #[error("invalid character id: \"{0}\"")]
    InvalidCharacterId(String),

    /// The story data is inconsistent.
    #[error("invalid story: {0}")]
    Invalid(String),

    /// A save slot does not exist.
    #[error("save slot {0} is empty")]
    EmptySlot(u32),

    /// Engine error.
    #[error("{0}")]
    Core(#[from] duo_core::CoreError),
}

impl StoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoryError::Io {
            path: path.into(),
            source,
        }
    }
}
