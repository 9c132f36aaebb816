//! Save slots and unlocked endings, persisted as one JSON file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use duo_core::{NodeKey, SessionState};

use crate::error::{StoryError, StoryResult};

/// A named saved session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSlot {
    /// Name chosen by the players.
    pub name: String,
    /// The saved session state.
    #[serde(flatten)]
    pub state: SessionState,
}

/// All save slots plus the endings unlocked across playthroughs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBook {
    #[serde(default)]
    slots: BTreeMap<u32, SaveSlot>,
    #[serde(default)]
    unlocked_endings: BTreeSet<NodeKey>,
}

impl SaveBook {
    /// Create an empty save book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a save book. A missing file is an empty book.
    pub fn load(path: &Path) -> StoryResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoryError::io(path, e)),
        }
    }

    /// Write the save book as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> StoryResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| StoryError::io(path, e))
    }

    /// Store a session in a slot, replacing what was there.
    pub fn store(&mut self, slot: u32, name: impl Into<String>, state: SessionState) {
        let name = name.into();
        info!("saved \"{name}\" to slot {slot}");
        self.slots.insert(slot, SaveSlot { name, state });
    }

    /// A stored slot.
    pub fn slot(&self, slot: u32) -> StoryResult<&SaveSlot> {
        self.slots.get(&slot).ok_or(StoryError::EmptySlot(slot))
    }

    /// All stored slots in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (u32, &SaveSlot)> {
        self.slots.iter().map(|(n, s)| (*n, s))
    }

    /// Remove a slot. Returns whether it existed.
    pub fn clear(&mut self, slot: u32) -> bool {
        self.slots.remove(&slot).is_some()
    }

    /// Mark an ending as unlocked. Returns `true` the first time.
    pub fn unlock_ending(&mut self, key: &NodeKey) -> bool {
        let new = self.unlocked_endings.insert(key.clone());
        if new {
            info!("unlocked ending {key}");
        }
        new
    }

    /// Whether an ending has been reached in any playthrough.
    pub fn is_unlocked(&self, key: &NodeKey) -> bool {
        self.unlocked_endings.contains(key)
    }

    /// Unlocked ending keys, sorted.
    pub fn unlocked_endings(&self) -> impl Iterator<Item = &NodeKey> {
        self.unlocked_endings.iter()
    }
}
