//! Error types for the traversal engine.

use thiserror::Error;

use crate::node::{Direction, NodeKey};

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while traversing a story graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A referenced node key does not exist in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeKey),

    /// No transition on the requested side is satisfied by the inventory.
    #[error("no available path {direction} of node {position}")]
    NoAvailablePath {
        /// Cursor position when the move was attempted.
        position: NodeKey,
        /// Requested direction.
        direction: Direction,
    },

    /// A session needs at least one character.
    #[error("a session needs at least one character")]
    NoCharacters,

    /// A turn index does not name any character.
    #[error("turn {index} is out of range for {players} player(s)")]
    TurnOutOfRange {
        /// Requested player index.
        index: usize,
        /// Number of characters in the session.
        players: usize,
    },

    /// A saved state does not fit the session it is restored into.
    #[error("state mismatch: {0}")]
    StateMismatch(String),

    /// A move was requested after the session left the graph.
    #[error("the session has already left the story graph")]
    SessionOver,
}
