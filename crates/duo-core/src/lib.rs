//! Story-graph traversal engine for Duo.
//!
//! A story is a [`ChoiceGraph`] of [`ChoiceNode`]s. Each node offers up to
//! two branches whose transitions are guarded by items; two or more
//! [`Character`]s take turns choosing, collecting items as they go. The
//! engine performs no I/O: a loader builds the graph and characters, a
//! controller calls [`GameSession::choose`] once per decision and presents
//! the returned [`Step`].

/// Player characters and inventories.
pub mod character;
/// Session configuration.
pub mod config;
/// Move resolution against an inventory.
pub mod cursor;
/// Error types used throughout the crate.
pub mod error;
/// The keyed container of choice nodes.
pub mod graph;
/// Choice nodes, branches, and transitions.
pub mod node;
/// Turn and position tracking for one playthrough.
pub mod session;
/// Persisted session state.
pub mod snapshot;

pub use character::{Character, Inventory};
pub use config::{SessionConfig, TurnPolicy};
pub use cursor::{Cursor, Outcome, resolve};
pub use error::{CoreError, CoreResult};
pub use graph::{ChoiceGraph, GraphIssue};
pub use node::{Branch, ChoiceNode, Destination, Direction, EXIT_KEY, NodeKey, START_KEY, Transition};
pub use session::{EndingReached, GameSession, Step, StepOutcome};
pub use snapshot::SessionState;
