//! On-disk JSON shape of a story file.
//!
//! ```json
//! {
//!   "nodes": {
//!     "0": {
//!       "text": "A fork in the road.",
//!       "leftText": "Forest", "nextLeft": [[[], "1"]],
//!       "rightText": "Gate", "nextRight": [[["KEY"], "2"], [[], "EXIT"]],
//!       "rightObjects": ["SHIELD"], "turn": 0, "level": 1
//!     }
//!   },
//!   "characters": { "0": { "nickname": "Lulucia", "abilities": ["FIRE"] } },
//!   "levels": { "1": "Chapter one" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use duo_core::{Branch, Character, ChoiceNode, SessionConfig, Transition};

use crate::error::{StoryError, StoryResult};

/// A whole story file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryFile {
    /// Nodes keyed by node key.
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeSpec>,
    /// Characters keyed by numeric id.
    #[serde(default)]
    pub characters: BTreeMap<String, CharacterSpec>,
    /// Introduction text per level.
    #[serde(default)]
    pub levels: BTreeMap<u32, String>,
    /// Optional session configuration.
    #[serde(default)]
    pub config: Option<SessionConfig>,
}

impl StoryFile {
    /// Parse a story file from JSON text.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert every node spec into a choice node.
    pub fn choice_nodes(&self) -> Vec<ChoiceNode> {
        self.nodes
            .iter()
            .map(|(key, spec)| spec.to_node(key))
            .collect()
    }

    /// Convert character specs, ordered by numeric id.
    pub fn characters(&self) -> StoryResult<Vec<Character>> {
        let mut characters = self
            .characters
            .iter()
            .map(|(id, spec)| {
                let id: u32 = id
                    .trim()
                    .parse()
                    .map_err(|_| StoryError::InvalidCharacterId(id.clone()))?;
                Ok(spec.to_character(id))
            })
            .collect::<StoryResult<Vec<_>>>()?;
        characters.sort_by_key(|c| c.id);
        Ok(characters)
    }
}

/// One node as written in a story file. Missing fields take defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSpec {
    /// Narrative body.
    pub text: String,
    /// Right transitions, in authored order.
    pub next_right: Vec<Transition>,
    /// Left transitions, in authored order.
    pub next_left: Vec<Transition>,
    /// Right button label.
    pub right_text: String,
    /// Left button label.
    pub left_text: String,
    /// Items granted when going right.
    pub right_objects: Vec<String>,
    /// Items granted when going left.
    pub left_objects: Vec<String>,
    /// Owning turn.
    pub turn: usize,
    /// Whether the node is an ending.
    #[serde(alias = "is_end")]
    pub is_end: bool,
    /// Level the node belongs to.
    pub level: u32,
    /// Title of the ending.
    #[serde(alias = "ending_title")]
    pub ending_title: Option<String>,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            next_right: Vec::new(),
            next_left: Vec::new(),
            right_text: String::new(),
            left_text: String::new(),
            right_objects: Vec::new(),
            left_objects: Vec::new(),
            turn: 0,
            is_end: false,
            level: 1,
            ending_title: None,
        }
    }
}

impl NodeSpec {
    /// Build the engine node for `key`.
    pub fn to_node(&self, key: &str) -> ChoiceNode {
        let mut node = ChoiceNode::new(key, self.text.clone())
            .with_left(Branch {
                label: self.left_text.clone(),
                transitions: self.next_left.clone(),
                rewards: self.left_objects.clone(),
            })
            .with_right(Branch {
                label: self.right_text.clone(),
                transitions: self.next_right.clone(),
                rewards: self.right_objects.clone(),
            })
            .with_turn(self.turn)
            .with_level(self.level);
        node.is_ending = self.is_end;
        node.ending_title = self.ending_title.clone();
        node
    }
}

/// One character as written in a story file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterSpec {
    /// Display name; defaults to `Player {id}`.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Starting inventory.
    #[serde(default, alias = "inventory")]
    pub abilities: Vec<String>,
    /// Portrait reference.
    #[serde(default)]
    pub image: Option<String>,
}

impl CharacterSpec {
    /// Build a character with its own copy of the starting inventory.
    pub fn to_character(&self, id: u32) -> Character {
        let mut character =
            Character::new(id, self.nickname.as_deref()).with_inventory(self.abilities.iter().cloned());
        if let Some(image) = &self.image {
            character = character.with_portrait(image.clone());
        }
        character
    }
}
