//! Player characters and their inventories.

use log::debug;
use serde::{Deserialize, Serialize};

/// Items (abilities or objects) owned by a character.
///
/// Membership is exact string equality. An item is stored at most once;
/// grant order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the item is owned.
    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|owned| owned == item)
    }

    /// Add an item unless already owned. Returns `true` if it was new.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Whether every item of `required` is owned.
    pub fn contains_all<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|item| self.contains(item.as_ref()))
    }

    /// Iterate over owned items.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is owned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owned items as a vector, in grant order.
    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for Inventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for item in iter {
            inventory.insert(item);
        }
        inventory
    }
}

impl From<Vec<String>> for Inventory {
    fn from(items: Vec<String>) -> Self {
        items.into_iter().collect()
    }
}

impl From<Inventory> for Vec<String> {
    fn from(inventory: Inventory) -> Self {
        inventory.items
    }
}

/// A player taking part in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Stable identifier.
    pub id: u32,
    /// Display name.
    pub nickname: String,
    /// Accumulated items.
    pub inventory: Inventory,
    /// Optional portrait reference (path or asset name).
    pub portrait: Option<String>,
}

impl Character {
    /// Create a character with an empty inventory.
    ///
    /// Without a nickname the character is called `Player {id}`.
    pub fn new(id: u32, nickname: Option<&str>) -> Self {
        let nickname = match nickname {
            Some(name) => name.to_string(),
            None => format!("Player {id}"),
        };
        Self {
            id,
            nickname,
            inventory: Inventory::new(),
            portrait: None,
        }
    }

    /// Replace the inventory with a fresh copy of `items`.
    pub fn with_inventory<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inventory = items.into_iter().collect();
        self
    }

    /// Set the portrait reference.
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    /// Add every item not already owned. Returns the newly added items.
    pub fn grant_items<I, S>(&mut self, items: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut granted = Vec::new();
        for item in items {
            let item = item.into();
            if self.inventory.insert(item.clone()) {
                granted.push(item);
            }
        }
        if !granted.is_empty() {
            debug!("{} received {:?}", self.nickname, granted);
        }
        granted
    }

    /// Whether the character owns the item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn granting_is_idempotent(items in proptest::collection::vec("[a-d]", 0..8)) {
            let mut once = Character::new(0, None);
            once.grant_items(items.clone());
            let mut twice = once.clone();
            twice.grant_items(items.clone());

            prop_assert_eq!(&once.inventory, &twice.inventory);
            for item in &items {
                prop_assert_eq!(once.inventory.iter().filter(|i| *i == item.as_str()).count(), 1);
            }
        }

        #[test]
        fn granting_nothing_changes_nothing(items in proptest::collection::vec("[a-d]", 0..8)) {
            let mut c = Character::new(0, None).with_inventory(items);
            let before = c.inventory.clone();
            let granted = c.grant_items(Vec::<String>::new());
            prop_assert!(granted.is_empty());
            prop_assert_eq!(before, c.inventory);
        }
    }
}
