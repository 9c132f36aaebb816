//! Story files, save slots, and the endings gallery for Duo.
//!
//! This crate sits between the file system and [`duo_core`]: it turns JSON
//! story files into a [`Story`] that can start or resume sessions, and keeps
//! a [`SaveBook`] of named slots and unlocked endings.

/// Error types for loading and saving.
pub mod error;
/// JSON schema of story files.
pub mod format;
/// Endings gallery.
pub mod gallery;
/// Save slots and unlocked endings.
pub mod saves;
/// Story assembly and session creation.
pub mod story;

pub use error::{StoryError, StoryResult};
pub use format::{CharacterSpec, NodeSpec, StoryFile};
pub use gallery::{EndingEntry, HIDDEN_TITLE, endings_gallery};
pub use saves::{SaveBook, SaveSlot};
pub use story::Story;
