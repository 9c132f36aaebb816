//! Endings gallery: which endings of a story have been unlocked.

use duo_core::{ChoiceGraph, NodeKey};

use crate::saves::SaveBook;

/// Shown instead of the title of an ending not yet reached.
pub const HIDDEN_TITLE: &str = "???????????????";

/// One ending of the story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingEntry {
    /// Key of the ending node.
    pub key: NodeKey,
    /// Level of the ending node.
    pub level: u32,
    /// Declared title.
    pub title: Option<String>,
    /// Whether any playthrough has reached it.
    pub unlocked: bool,
}

impl EndingEntry {
    /// Title to show: masked while locked, the key if untitled.
    pub fn display_title(&self) -> &str {
        if !self.unlocked {
            return HIDDEN_TITLE;
        }
        self.title.as_deref().unwrap_or(self.key.as_str())
    }
}

/// Every ending of `graph`, ordered by level then key.
pub fn endings_gallery(graph: &ChoiceGraph, book: &SaveBook) -> Vec<EndingEntry> {
    graph
        .endings()
        .into_iter()
        .map(|node| EndingEntry {
            key: node.key.clone(),
            level: node.level,
            title: node.ending_title.clone(),
            unlocked: book.is_unlocked(&node.key),
        })
        .collect()
}
