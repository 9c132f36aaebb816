//! Configuration for a game session.

use serde::{Deserialize, Serialize};

use crate::node::NodeKey;

/// How the turn moves after a successful choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnPolicy {
    /// The destination node's owning turn decides who plays next.
    #[default]
    NodeOwned,
    /// Players take turns in order, wrapping around.
    RoundRobin,
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key of the node where play starts.
    pub start: NodeKey,
    /// Turn advancement rule.
    pub turn_policy: TurnPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start: NodeKey::start(),
            turn_policy: TurnPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Set the start node.
    pub fn with_start(mut self, start: impl Into<NodeKey>) -> Self {
        self.start = start.into();
        self
    }

    /// Set the turn policy.
    pub fn with_turn_policy(mut self, policy: TurnPolicy) -> Self {
        self.turn_policy = policy;
        self
    }
}
