//! Persisted session state for save and load.

use serde::{Deserialize, Serialize};

use crate::character::Inventory;
use crate::node::NodeKey;

/// Everything needed to resume a session over the same story graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Key of the current node.
    #[serde(rename = "node")]
    pub current_node: NodeKey,
    /// Index of the player whose turn it is.
    #[serde(rename = "turn")]
    pub current_player: usize,
    /// One inventory per character, in session order.
    pub inventories: Vec<Inventory>,
}
