//! The choice graph: every node of a story keyed by [`NodeKey`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::node::{ChoiceNode, Destination, Direction, NodeKey};

/// All choice nodes of a story plus per-level introduction text.
///
/// Read-only once loaded, apart from [`ChoiceGraph::merge`], so one graph
/// can back several sessions behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ChoiceGraph {
    nodes: HashMap<NodeKey, ChoiceNode>,
    level_intros: BTreeMap<u32, String>,
}

impl ChoiceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from nodes. Later duplicates replace earlier ones.
    pub fn from_nodes(nodes: impl IntoIterator<Item = ChoiceNode>) -> Self {
        let mut graph = Self::new();
        graph.merge(nodes);
        graph
    }

    /// Set the introduction text shown when `level` is entered.
    pub fn with_level_intro(mut self, level: u32, text: impl Into<String>) -> Self {
        self.level_intros.insert(level, text.into());
        self
    }

    /// Look up a node. A missing key means corrupt story data.
    pub fn get(&self, key: &NodeKey) -> CoreResult<&ChoiceNode> {
        self.nodes
            .get(key)
            .ok_or_else(|| CoreError::NodeNotFound(key.clone()))
    }

    /// Whether a node with this key exists.
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Add or overwrite nodes, e.g. when a story arrives in several parts.
    pub fn merge(&mut self, nodes: impl IntoIterator<Item = ChoiceNode>) {
        for node in nodes {
            self.nodes.insert(node.key.clone(), node);
        }
    }

    /// Add or overwrite level introductions.
    pub fn merge_level_intros(&mut self, intros: impl IntoIterator<Item = (u32, String)>) {
        self.level_intros.extend(intros);
    }

    /// Introduction text for a level, if the story has one.
    pub fn level_intro(&self, level: u32) -> Option<&str> {
        self.level_intros.get(&level).map(String::as_str)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &ChoiceNode> {
        self.nodes.values()
    }

    /// Ending nodes ordered by level, then key.
    pub fn endings(&self) -> Vec<&ChoiceNode> {
        let mut endings: Vec<&ChoiceNode> = self.nodes.values().filter(|n| n.is_ending).collect();
        endings.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.key.cmp(&b.key)));
        endings
    }

    /// Distinct levels used by nodes, ascending.
    pub fn levels(&self) -> Vec<u32> {
        let mut levels: Vec<u32> = self.nodes.values().map(|n| n.level).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    /// Check structural invariants without modifying anything.
    ///
    /// `start` must exist, every destination must be a node or the exit,
    /// and every owning turn must be below `players`.
    pub fn validate(&self, start: &NodeKey, players: usize) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        if !self.contains(start) {
            issues.push(GraphIssue::MissingStart(start.clone()));
        }

        let mut keys: Vec<&NodeKey> = self.nodes.keys().collect();
        keys.sort();

        for key in keys {
            let node = &self.nodes[key];
            for (direction, transition) in node.transitions() {
                if let Destination::Node(dest) = &transition.destination
                    && !self.contains(dest)
                {
                    issues.push(GraphIssue::DanglingDestination {
                        from: key.clone(),
                        direction,
                        to: dest.clone(),
                    });
                }
            }
            if node.owning_turn >= players {
                issues.push(GraphIssue::TurnOutOfRange {
                    node: key.clone(),
                    turn: node.owning_turn,
                    players,
                });
            }
        }

        issues
    }
}

/// A structural problem found by [`ChoiceGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// The start node does not exist.
    MissingStart(NodeKey),
    /// A transition points at a key that is neither a node nor the exit.
    DanglingDestination {
        /// Node holding the transition.
        from: NodeKey,
        /// Side of the transition.
        direction: Direction,
        /// Unknown destination.
        to: NodeKey,
    },
    /// A node is owned by a player that does not exist.
    TurnOutOfRange {
        /// Offending node.
        node: NodeKey,
        /// Declared owning turn.
        turn: usize,
        /// Number of characters.
        players: usize,
    },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::MissingStart(key) => write!(f, "start node {key} is missing"),
            GraphIssue::DanglingDestination {
                from,
                direction,
                to,
            } => write!(f, "node {from} ({direction}) leads to unknown node {to}"),
            GraphIssue::TurnOutOfRange {
                node,
                turn,
                players,
            } => write!(f, "node {node} is owned by turn {turn} but there are {players} player(s)"),
        }
    }
}
