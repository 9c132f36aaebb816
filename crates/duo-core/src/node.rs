//! Choice nodes, their branches, and guarded transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::Inventory;

/// Reserved destination name meaning "leave the graph".
pub const EXIT_KEY: &str = "EXIT";

/// Conventional key of the first node of a story.
pub const START_KEY: &str = "0";

/// Unique identifier of a node within a [`ChoiceGraph`](crate::ChoiceGraph).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The conventional start key, `"0"`.
    pub fn start() -> Self {
        Self(START_KEY.to_string())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a transition leads.
///
/// In story data the exit is spelled as the reserved key `"EXIT"`; once
/// parsed it is a distinct variant and never looked up as a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Destination {
    /// Move to another node of the same graph.
    Node(NodeKey),
    /// Leave the graph entirely.
    Exit,
}

impl Destination {
    /// Destination pointing at the node with the given key.
    pub fn node(key: impl Into<NodeKey>) -> Self {
        Destination::Node(key.into())
    }

    /// The node key, unless this is the exit.
    pub fn key(&self) -> Option<&NodeKey> {
        match self {
            Destination::Node(key) => Some(key),
            Destination::Exit => None,
        }
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        if s == EXIT_KEY {
            Destination::Exit
        } else {
            Destination::Node(NodeKey(s))
        }
    }
}

impl From<&str> for Destination {
    fn from(s: &str) -> Self {
        Destination::from(s.to_string())
    }
}

impl From<Destination> for String {
    fn from(d: Destination) -> Self {
        match d {
            Destination::Node(key) => key.0,
            Destination::Exit => EXIT_KEY.to_string(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Node(key) => write!(f, "{key}"),
            Destination::Exit => f.write_str(EXIT_KEY),
        }
    }
}

/// Which of the two branches a player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The left branch.
    Left,
    /// The right branch.
    Right,
}

impl Direction {
    /// Both directions, left first.
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// A guarded edge: taken when every required item is in the inventory.
///
/// Serialized as a two-element array `[[items...], "destination"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(Vec<String>, Destination)",
    into = "(Vec<String>, Destination)"
)]
pub struct Transition {
    /// Items that must all be owned. Empty means unconditional.
    pub requires: Vec<String>,
    /// Where the transition leads.
    pub destination: Destination,
}

impl Transition {
    /// An unconditional transition.
    pub fn to(destination: impl Into<Destination>) -> Self {
        Self {
            requires: Vec::new(),
            destination: destination.into(),
        }
    }

    /// A transition guarded by the given items.
    pub fn requiring<I, S>(requires: I, destination: impl Into<Destination>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requires: requires.into_iter().map(Into::into).collect(),
            destination: destination.into(),
        }
    }

    /// Whether the requirement set is a subset of `inventory`.
    pub fn is_satisfied_by(&self, inventory: &Inventory) -> bool {
        self.requires.iter().all(|item| inventory.contains(item))
    }
}

impl From<(Vec<String>, Destination)> for Transition {
    fn from((requires, destination): (Vec<String>, Destination)) -> Self {
        Self {
            requires,
            destination,
        }
    }
}

impl From<Transition> for (Vec<String>, Destination) {
    fn from(t: Transition) -> Self {
        (t.requires, t.destination)
    }
}

/// One side of a choice node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    /// Button label. Empty means the branch is not offered.
    pub label: String,
    /// Transitions in authored order; the first satisfied one wins.
    pub transitions: Vec<Transition>,
    /// Items granted to the acting player when this branch is taken.
    pub rewards: Vec<String>,
}

impl Branch {
    /// Create a labelled branch with no transitions.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Append a transition after the existing ones.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a reward item.
    pub fn with_reward(mut self, item: impl Into<String>) -> Self {
        self.rewards.push(item.into());
        self
    }

    /// Whether the branch should be offered to the player.
    pub fn is_offered(&self) -> bool {
        !self.label.is_empty()
    }
}

/// One story beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceNode {
    /// Unique key within the graph.
    pub key: NodeKey,
    /// Narrative body.
    pub text: String,
    /// Left branch.
    pub left: Branch,
    /// Right branch.
    pub right: Branch,
    /// Index of the character whose choice this is.
    pub owning_turn: usize,
    /// Chapter the node belongs to.
    pub level: u32,
    /// Whether reaching this node ends the story.
    pub is_ending: bool,
    /// Label used to track unlocked endings.
    pub ending_title: Option<String>,
}

impl ChoiceNode {
    /// Create a level-1 node with no branches.
    pub fn new(key: impl Into<NodeKey>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            left: Branch::default(),
            right: Branch::default(),
            owning_turn: 0,
            level: 1,
            is_ending: false,
            ending_title: None,
        }
    }

    /// Set the left branch.
    pub fn with_left(mut self, branch: Branch) -> Self {
        self.left = branch;
        self
    }

    /// Set the right branch.
    pub fn with_right(mut self, branch: Branch) -> Self {
        self.right = branch;
        self
    }

    /// Set the owning turn.
    pub fn with_turn(mut self, turn: usize) -> Self {
        self.owning_turn = turn;
        self
    }

    /// Set the level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Mark the node as an ending with an optional title.
    pub fn as_ending(mut self, title: Option<&str>) -> Self {
        self.is_ending = true;
        self.ending_title = title.map(str::to_string);
        self
    }

    /// The branch on the given side.
    pub fn branch(&self, direction: Direction) -> &Branch {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Directions whose branch carries a label.
    pub fn available_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.branch(*d).is_offered())
            .collect()
    }

    /// True if either side has at least one transition.
    pub fn has_transitions(&self) -> bool {
        !self.left.transitions.is_empty() || !self.right.transitions.is_empty()
    }

    /// Every transition of the node, tagged with its side.
    pub fn transitions(&self) -> impl Iterator<Item = (Direction, &Transition)> {
        self.left
            .transitions
            .iter()
            .map(|t| (Direction::Left, t))
            .chain(self.right.transitions.iter().map(|t| (Direction::Right, t)))
    }
}
