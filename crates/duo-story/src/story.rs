//! Assembling a playable story from one or more story files.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use duo_core::{Character, ChoiceGraph, GameSession, GraphIssue, SessionConfig, SessionState};

use crate::error::{StoryError, StoryResult};
use crate::format::StoryFile;

/// A loaded story: the shared graph, the cast, and the session settings.
#[derive(Debug, Clone)]
pub struct Story {
    graph: Arc<ChoiceGraph>,
    characters: Vec<Character>,
    config: SessionConfig,
}

impl Story {
    /// Build a story from a parsed base file.
    pub fn from_file(file: StoryFile) -> StoryResult<Self> {
        let characters = file.characters()?;
        let mut graph = ChoiceGraph::from_nodes(file.choice_nodes());
        graph.merge_level_intros(file.levels);
        Ok(Self {
            graph: Arc::new(graph),
            characters,
            config: file.config.unwrap_or_default(),
        })
    }

    /// Parse a story from JSON text.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        Self::from_file(StoryFile::from_json(json)?)
    }

    /// Read a story file from disk and report validation issues as warnings.
    pub fn load(path: &Path) -> StoryResult<Self> {
        Self::load_parts(&[path])
    }

    /// Read a base story file followed by additional parts.
    ///
    /// Later parts add or overwrite nodes and level intros. Only the first
    /// file may declare characters and configuration.
    pub fn load_parts<P: AsRef<Path>>(paths: &[P]) -> StoryResult<Self> {
        let (first, rest) = paths
            .split_first()
            .ok_or_else(|| StoryError::Invalid("no story files given".to_string()))?;

        let mut story = Self::from_file(read_file(first.as_ref())?)?;
        for path in rest {
            story.merge_part(read_file(path.as_ref())?)?;
        }

        info!(
            "loaded story: {} nodes, {} characters",
            story.graph.len(),
            story.characters.len()
        );
        for issue in story.validate() {
            warn!("{issue}");
        }
        Ok(story)
    }

    /// Merge another part into the story.
    pub fn merge_part(&mut self, part: StoryFile) -> StoryResult<()> {
        if !part.characters.is_empty() || part.config.is_some() {
            return Err(StoryError::Invalid(
                "characters and config may only be declared in the first story file".to_string(),
            ));
        }
        let nodes = part.choice_nodes();
        let graph = Arc::make_mut(&mut self.graph);
        graph.merge(nodes);
        graph.merge_level_intros(part.levels);
        Ok(())
    }

    /// The story graph.
    pub fn graph(&self) -> &ChoiceGraph {
        &self.graph
    }

    /// The cast, ordered by id, with starting inventories.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Session settings declared by the story.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Override the session settings.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Structural problems of the story graph.
    pub fn validate(&self) -> Vec<GraphIssue> {
        self.graph
            .validate(&self.config.start, self.characters.len())
    }

    /// Start a new playthrough with fresh copies of the characters.
    pub fn new_session(&self) -> StoryResult<GameSession> {
        Ok(GameSession::with_config(
            Arc::clone(&self.graph),
            self.characters.clone(),
            self.config.clone(),
        )?)
    }

    /// Resume a playthrough from a saved state.
    pub fn resume(&self, state: &SessionState) -> StoryResult<GameSession> {
        Ok(GameSession::from_state(
            Arc::clone(&self.graph),
            self.characters.clone(),
            self.config.clone(),
            state,
        )?)
    }
}

fn read_file(path: &Path) -> StoryResult<StoryFile> {
    let json = std::fs::read_to_string(path).map_err(|e| StoryError::io(path, e))?;
    StoryFile::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duo_core::{CoreError, Direction, StepOutcome};
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = r#"{
        "nodes": {
            "0": {
                "text": "Initial encounter. Choose your path.",
                "leftText": "Go Forest", "nextLeft": [[[], "FOREST_PATH"]], "leftObjects": ["SWORD"],
                "rightText": "Go Mountain", "nextRight": [[[], "MOUNTAIN_PATH"]], "rightObjects": ["SHIELD"]
            },
            "FOREST_PATH": {"text": "You are in the forest.", "turn": 1},
            "MOUNTAIN_PATH": {"text": "You are on the mountain.", "turn": 1}
        },
        "characters": {
            "0": {"nickname": "Lulucia"},
            "1": {"nickname": "Partner"}
        },
        "levels": {"1": "The journey begins."}
    }"#;

    const PART: &str = r#"{
        "nodes": {
            "FOREST_PATH": {
                "text": "The forest thickens.", "turn": 1,
                "leftText": "Press on", "nextLeft": [[["SWORD"], "CLEARING"]]
            },
            "CLEARING": {"text": "A quiet clearing.", "level": 2, "isEnd": true, "endingTitle": "Peace"}
        },
        "levels": {"2": "Deeper in."}
    }"#;

    #[test]
    fn play_simple_story() {
        let story = Story::from_json(BASE).unwrap();
        assert!(story.validate().is_empty());

        let mut session = story.new_session().unwrap();
        let step = session.choose(Direction::Left).unwrap();
        assert_eq!(step.outcome, StepOutcome::Moved("FOREST_PATH".into()));
        assert!(session.characters()[0].has_item("SWORD"));
        assert_eq!(session.current_player().nickname, "Partner");

        let mut other = story.new_session().unwrap();
        other.choose(Direction::Right).unwrap();
        assert!(other.characters()[0].has_item("SHIELD"));
        assert!(!other.characters()[0].has_item("SWORD"));
        assert!(story.characters()[0].inventory.is_empty());
    }

    #[test]
    fn base_file_carries_level_intros() {
        let story = Story::from_json(BASE).unwrap();
        assert_eq!(story.graph().level_intro(1), Some("The journey begins."));
        assert_eq!(story.graph().level_intro(2), None);
    }

    #[test]
    fn parts_extend_the_graph() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.json");
        let part = dir.path().join("level2.json");
        fs::write(&base, BASE).unwrap();
        fs::write(&part, PART).unwrap();

        let story = Story::load_parts(&[&base, &part]).unwrap();
        assert_eq!(story.graph().len(), 4);
        assert_eq!(
            story.graph().get(&"FOREST_PATH".into()).unwrap().text,
            "The forest thickens."
        );
        assert_eq!(story.graph().level_intro(1), Some("The journey begins."));
        assert_eq!(story.graph().level_intro(2), Some("Deeper in."));
        assert!(story.validate().is_empty());
    }

    #[test]
    fn parts_cannot_redeclare_characters() {
        let mut story = Story::from_json(BASE).unwrap();
        let part = StoryFile::from_json(r#"{"characters": {"2": {}}}"#).unwrap();
        assert!(matches!(story.merge_part(part), Err(StoryError::Invalid(_))));
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Story::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoryError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn no_files() {
        let paths: [&Path; 0] = [];
        assert!(matches!(
            Story::load_parts(&paths),
            Err(StoryError::Invalid(_))
        ));
    }

    #[test]
    fn story_without_characters_cannot_start() {
        let story = Story::from_json(r#"{"nodes": {"0": {"text": "alone"}}}"#).unwrap();
        assert!(matches!(
            story.new_session(),
            Err(StoryError::Core(CoreError::NoCharacters))
        ));
    }

    #[test]
    fn resume_from_state() {
        let story = Story::from_json(BASE).unwrap();
        let mut session = story.new_session().unwrap();
        session.choose(Direction::Left).unwrap();

        let resumed = story.resume(&session.snapshot()).unwrap();
        assert_eq!(resumed.current_node_key().as_str(), "FOREST_PATH");
        assert_eq!(resumed.current_player_index(), 1);
        assert!(resumed.characters()[0].has_item("SWORD"));
    }
}
