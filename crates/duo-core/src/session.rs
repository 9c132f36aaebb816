//! Game session: whose turn it is and where play stands.

use std::sync::Arc;

use log::{debug, info};

use crate::character::Character;
use crate::config::{SessionConfig, TurnPolicy};
use crate::cursor::{Cursor, Outcome, resolve};
use crate::error::{CoreError, CoreResult};
use crate::graph::ChoiceGraph;
use crate::node::{ChoiceNode, Direction, NodeKey};
use crate::snapshot::SessionState;

/// Where a choice led.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Play moved to this node.
    Moved(NodeKey),
    /// Play left the graph.
    Exited,
}

/// An ending reached by a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingReached {
    /// Key of the ending node.
    pub key: NodeKey,
    /// Title used for unlock tracking.
    pub title: Option<String>,
}

/// Everything a presenter needs to know about one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Index of the player who chose.
    pub actor: usize,
    /// Direction taken.
    pub direction: Direction,
    /// Rewards that were new to the actor.
    pub granted: Vec<String>,
    /// Where play went.
    pub outcome: StepOutcome,
    /// Set when the destination belongs to a level not yet announced.
    pub entered_level: Option<u32>,
    /// Set when the destination is an ending.
    pub ending: Option<EndingReached>,
}

/// One playthrough of a story.
///
/// The session is the only owner of the traversal position; the cursor it
/// hands out borrows that position instead of keeping a copy.
#[derive(Debug, Clone)]
pub struct GameSession {
    graph: Arc<ChoiceGraph>,
    characters: Vec<Character>,
    current_player: usize,
    position: NodeKey,
    config: SessionConfig,
    last_level: Option<u32>,
    finished: bool,
}

impl GameSession {
    /// Create a session at the default start node.
    pub fn new(graph: Arc<ChoiceGraph>, characters: Vec<Character>) -> CoreResult<Self> {
        Self::with_config(graph, characters, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    ///
    /// Fails with [`CoreError::NoCharacters`] when `characters` is empty.
    pub fn with_config(
        graph: Arc<ChoiceGraph>,
        characters: Vec<Character>,
        config: SessionConfig,
    ) -> CoreResult<Self> {
        if characters.is_empty() {
            return Err(CoreError::NoCharacters);
        }
        Ok(Self {
            graph,
            characters,
            current_player: 0,
            position: config.start.clone(),
            config,
            last_level: None,
            finished: false,
        })
    }

    /// Create a session and restore a saved state into it.
    pub fn from_state(
        graph: Arc<ChoiceGraph>,
        characters: Vec<Character>,
        config: SessionConfig,
        state: &SessionState,
    ) -> CoreResult<Self> {
        let mut session = Self::with_config(graph, characters, config)?;
        session.restore(state)?;
        Ok(session)
    }

    /// The story graph.
    pub fn graph(&self) -> &ChoiceGraph {
        &self.graph
    }

    /// Shared handle to the story graph.
    pub fn graph_handle(&self) -> Arc<ChoiceGraph> {
        Arc::clone(&self.graph)
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// All characters, in turn order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Index of the player whose turn it is.
    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Character {
        &self.characters[self.current_player]
    }

    /// Mutable access to the player whose turn it is.
    pub fn current_player_mut(&mut self) -> &mut Character {
        &mut self.characters[self.current_player]
    }

    /// Pass the turn: to `forced` if given, otherwise to the next player.
    pub fn advance_turn(&mut self, forced: Option<usize>) -> CoreResult<()> {
        let next = match forced {
            Some(index) => self.checked_turn(index)?,
            None => (self.current_player + 1) % self.characters.len(),
        };
        debug!("turn {} -> {}", self.current_player, next);
        self.current_player = next;
        Ok(())
    }

    /// Key of the current node.
    pub fn current_node_key(&self) -> &NodeKey {
        &self.position
    }

    /// Move play to `key` without validation.
    pub fn set_current_node(&mut self, key: impl Into<NodeKey>) {
        self.position = key.into();
    }

    /// The node play currently stands on.
    pub fn current_node(&self) -> CoreResult<&ChoiceNode> {
        self.graph.get(&self.position)
    }

    /// A cursor over the session's own position.
    pub fn cursor(&mut self) -> Cursor<'_, '_> {
        Cursor::new(&self.graph, &mut self.position)
    }

    /// Whether the current node has any transition left.
    pub fn has_pending_choices(&self) -> CoreResult<bool> {
        Ok(self.current_node()?.has_transitions())
    }

    /// Whether play has left the graph.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Report the current level if it has not been announced yet.
    pub fn observe_level(&mut self) -> CoreResult<Option<u32>> {
        let level = self.current_node()?.level;
        Ok(self.note_level(level))
    }

    /// Take the branch in `direction` for the current player.
    ///
    /// The branch rewards count towards the requirement check. If no
    /// transition is available the session is left untouched, rewards
    /// included.
    pub fn choose(&mut self, direction: Direction) -> CoreResult<Step> {
        if self.finished {
            return Err(CoreError::SessionOver);
        }

        let graph = Arc::clone(&self.graph);
        let actor = self.current_player;
        let here = graph.get(&self.position)?;
        let rewards = &here.branch(direction).rewards;

        let mut inventory = self.characters[actor].inventory.clone();
        for item in rewards {
            inventory.insert(item.as_str());
        }

        let outcome = resolve(&graph, &self.position, direction, &inventory)?;
        let next_turn = match outcome {
            Outcome::Continues(next) => Some(self.turn_after(next)?),
            Outcome::ExitsGraph => None,
        };

        let granted = self.characters[actor].grant_items(rewards.iter().cloned());

        let step = match outcome {
            Outcome::Continues(next) => {
                // The level being left counts as announced.
                if self.last_level.is_none() {
                    self.last_level = Some(here.level);
                }
                self.position = next.key.clone();
                if let Some(turn) = next_turn {
                    self.advance_turn(Some(turn))?;
                }
                let entered_level = self.note_level(next.level);
                let ending = next.is_ending.then(|| EndingReached {
                    key: next.key.clone(),
                    title: next.ending_title.clone(),
                });
                if let Some(ending) = &ending {
                    info!("ending reached: {}", ending.key);
                }
                Step {
                    actor,
                    direction,
                    granted,
                    outcome: StepOutcome::Moved(next.key.clone()),
                    entered_level,
                    ending,
                }
            }
            Outcome::ExitsGraph => {
                info!("left the story graph from {}", self.position);
                self.finished = true;
                Step {
                    actor,
                    direction,
                    granted,
                    outcome: StepOutcome::Exited,
                    entered_level: None,
                    ending: None,
                }
            }
        };

        Ok(step)
    }

    /// Capture the state needed to resume this session later.
    pub fn snapshot(&self) -> SessionState {
        SessionState {
            current_node: self.position.clone(),
            current_player: self.current_player,
            inventories: self
                .characters
                .iter()
                .map(|c| c.inventory.clone())
                .collect(),
        }
    }

    /// Replace position, turn and inventories with a saved state.
    ///
    /// The state is checked completely before anything is changed.
    pub fn restore(&mut self, state: &SessionState) -> CoreResult<()> {
        let turn = self.checked_turn(state.current_player)?;
        if state.inventories.len() != self.characters.len() {
            return Err(CoreError::StateMismatch(format!(
                "{} inventories for {} characters",
                state.inventories.len(),
                self.characters.len()
            )));
        }
        let level = self.graph.get(&state.current_node)?.level;

        for (character, inventory) in self.characters.iter_mut().zip(&state.inventories) {
            character.inventory = inventory.clone();
        }
        self.position = state.current_node.clone();
        self.current_player = turn;
        self.last_level = Some(level);
        self.finished = false;

        info!("restored session at {} (turn {})", self.position, turn);
        Ok(())
    }

    fn checked_turn(&self, index: usize) -> CoreResult<usize> {
        if index < self.characters.len() {
            Ok(index)
        } else {
            Err(CoreError::TurnOutOfRange {
                index,
                players: self.characters.len(),
            })
        }
    }

    fn turn_after(&self, next: &ChoiceNode) -> CoreResult<usize> {
        match self.config.turn_policy {
            TurnPolicy::NodeOwned => self.checked_turn(next.owning_turn),
            TurnPolicy::RoundRobin => Ok((self.current_player + 1) % self.characters.len()),
        }
    }

    fn note_level(&mut self, level: u32) -> Option<u32> {
        if self.last_level == Some(level) {
            return None;
        }
        info!("entered level {level}");
        self.last_level = Some(level);
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Branch, Transition};

    fn castle() -> Arc<ChoiceGraph> {
        Arc::new(
            ChoiceGraph::from_nodes([
                ChoiceNode::new("0", "You stand before a castle.")
                    .with_left(
                        Branch::new("Search for a secret passage")
                            .with_transition(Transition::to("SECRET"))
                            .with_reward("SWORD"),
                    )
                    .with_right(
                        Branch::new("Use the main gate")
                            .with_transition(Transition::requiring(["KEY"], "GATE"))
                            .with_reward("SHIELD"),
                    ),
                ChoiceNode::new("SECRET", "A narrow tunnel.")
                    .with_turn(1)
                    .with_left(Branch::new("Crawl on").with_transition(Transition::to("HALL")))
                    .with_right(Branch::new("Give up").with_transition(Transition::to("EXIT"))),
                ChoiceNode::new("GATE", "The gate is guarded."),
                ChoiceNode::new("HALL", "The great hall.")
                    .with_level(2)
                    .as_ending(Some("The Hall")),
            ])
            .with_level_intro(2, "Inside the walls."),
        )
    }

    fn duo() -> Vec<Character> {
        vec![
            Character::new(0, Some("Ezio")),
            Character::new(1, Some("Altair")),
        ]
    }

    fn session() -> GameSession {
        GameSession::new(castle(), duo()).unwrap()
    }

    #[test]
    fn defaults() {
        let s = session();
        assert_eq!(s.current_player_index(), 0);
        assert_eq!(s.current_node_key().as_str(), "0");
        assert_eq!(s.current_player().nickname, "Ezio");
        assert!(!s.is_finished());
    }

    #[test]
    fn empty_characters_rejected() {
        let err = GameSession::new(castle(), Vec::new()).unwrap_err();
        assert_eq!(err, CoreError::NoCharacters);
    }

    #[test]
    fn round_robin_wraps() {
        let mut s = session();
        s.advance_turn(None).unwrap();
        assert_eq!(s.current_player_index(), 1);
        assert_eq!(s.current_player().nickname, "Altair");
        s.advance_turn(None).unwrap();
        assert_eq!(s.current_player_index(), 0);
        assert_eq!(s.current_player().nickname, "Ezio");
    }

    #[test]
    fn forced_turn() {
        let mut s = session();
        s.advance_turn(Some(1)).unwrap();
        assert_eq!(s.current_player_index(), 1);
        s.advance_turn(Some(1)).unwrap();
        assert_eq!(s.current_player_index(), 1);

        let err = s.advance_turn(Some(2)).unwrap_err();
        assert_eq!(err, CoreError::TurnOutOfRange { index: 2, players: 2 });
        assert_eq!(s.current_player_index(), 1);
    }

    #[test]
    fn set_current_node_is_unchecked() {
        let mut s = session();
        s.set_current_node("GATE");
        assert_eq!(s.current_node().unwrap().text, "The gate is guarded.");
        s.set_current_node("nowhere");
        assert!(matches!(s.current_node(), Err(CoreError::NodeNotFound(_))));
    }

    #[test]
    fn choose_moves_grants_and_passes_turn() {
        let mut s = session();
        assert_eq!(s.observe_level().unwrap(), Some(1));

        let step = s.choose(Direction::Left).unwrap();
        assert_eq!(step.actor, 0);
        assert_eq!(step.granted, vec!["SWORD"]);
        assert_eq!(step.outcome, StepOutcome::Moved("SECRET".into()));
        assert_eq!(step.entered_level, None);
        assert_eq!(step.ending, None);

        assert!(s.characters()[0].has_item("SWORD"));
        assert_eq!(s.current_node_key().as_str(), "SECRET");
        // SECRET is owned by turn 1.
        assert_eq!(s.current_player().nickname, "Altair");
    }

    #[test]
    fn failed_choice_changes_nothing() {
        let mut s = session();
        let err = s.choose(Direction::Right).unwrap_err();
        assert_eq!(
            err,
            CoreError::NoAvailablePath {
                position: "0".into(),
                direction: Direction::Right,
            }
        );
        assert_eq!(s.current_node_key().as_str(), "0");
        assert_eq!(s.current_player_index(), 0);
        assert!(s.current_player().inventory.is_empty());
    }

    #[test]
    fn reward_counts_towards_requirements() {
        let graph = Arc::new(ChoiceGraph::from_nodes([
            ChoiceNode::new("0", "A key lies on the floor.").with_right(
                Branch::new("Pick it up and open the door")
                    .with_reward("KEY")
                    .with_transition(Transition::requiring(["KEY"], "1")),
            ),
            ChoiceNode::new("1", "Open door."),
        ]));
        let mut s = GameSession::new(graph, duo()).unwrap();
        let step = s.choose(Direction::Right).unwrap();
        assert_eq!(step.outcome, StepOutcome::Moved("1".into()));
        assert!(s.characters()[0].has_item("KEY"));
    }

    #[test]
    fn entering_a_level_and_reaching_an_ending() {
        let mut s = session();
        s.observe_level().unwrap();
        s.choose(Direction::Left).unwrap();

        let step = s.choose(Direction::Left).unwrap();
        assert_eq!(step.actor, 1);
        assert_eq!(step.entered_level, Some(2));
        assert_eq!(s.graph().level_intro(2), Some("Inside the walls."));
        assert_eq!(
            step.ending,
            Some(EndingReached {
                key: "HALL".into(),
                title: Some("The Hall".to_string()),
            })
        );
        assert_eq!(s.has_pending_choices(), Ok(false));
        assert_eq!(s.observe_level().unwrap(), None);
    }

    #[test]
    fn first_choice_without_observing_stays_in_level() {
        let graph = Arc::new(ChoiceGraph::from_nodes([
            ChoiceNode::new("0", "Start")
                .with_left(Branch::new("Walk").with_transition(Transition::to("1"))),
            ChoiceNode::new("1", "Same level")
                .with_left(Branch::new("Climb").with_transition(Transition::to("2"))),
            ChoiceNode::new("2", "Upstairs").with_level(2),
        ]));
        let mut s = GameSession::new(graph, duo()).unwrap();

        let step = s.choose(Direction::Left).unwrap();
        assert_eq!(step.entered_level, None);

        let step = s.choose(Direction::Left).unwrap();
        assert_eq!(step.entered_level, Some(2));
    }

    #[test]
    fn exit_finishes_the_session() {
        let mut s = session();
        s.choose(Direction::Left).unwrap();

        let step = s.choose(Direction::Right).unwrap();
        assert_eq!(step.outcome, StepOutcome::Exited);
        assert!(s.is_finished());
        assert_eq!(s.current_node_key().as_str(), "SECRET");
        assert_eq!(s.choose(Direction::Left), Err(CoreError::SessionOver));
    }

    #[test]
    fn round_robin_policy_ignores_owning_turn() {
        let config = SessionConfig::default().with_turn_policy(TurnPolicy::RoundRobin);
        let mut s = GameSession::with_config(castle(), duo(), config).unwrap();
        s.advance_turn(Some(1)).unwrap();
        s.current_player_mut().grant_items(["SWORD"]);

        s.choose(Direction::Left).unwrap();
        assert_eq!(s.current_player_index(), 0);
    }

    #[test]
    fn owning_turn_out_of_range_is_rejected_before_commit() {
        let graph = Arc::new(ChoiceGraph::from_nodes([
            ChoiceNode::new("0", "Start")
                .with_left(Branch::new("Go").with_reward("X").with_transition(Transition::to("1"))),
            ChoiceNode::new("1", "Third player's node").with_turn(2),
        ]));
        let mut s = GameSession::new(graph, duo()).unwrap();
        let err = s.choose(Direction::Left).unwrap_err();
        assert_eq!(err, CoreError::TurnOutOfRange { index: 2, players: 2 });
        assert_eq!(s.current_node_key().as_str(), "0");
        assert!(s.current_player().inventory.is_empty());
    }

    #[test]
    fn cursor_moves_the_session_position() {
        let mut s = session();
        let inventory = s.current_player().inventory.clone();
        s.cursor().resolve(Direction::Left, &inventory).unwrap();
        assert_eq!(s.current_node_key().as_str(), "SECRET");
    }

    #[test]
    fn snapshot_round_trip() {
        let mut s = session();
        s.choose(Direction::Left).unwrap();
        s.characters[1].grant_items(["KEY"]);

        let json = serde_json::to_string(&s.snapshot()).unwrap();
        let state: SessionState = serde_json::from_str(&json).unwrap();

        let restored =
            GameSession::from_state(castle(), duo(), SessionConfig::default(), &state).unwrap();
        assert_eq!(restored.current_node_key(), s.current_node_key());
        assert_eq!(restored.current_player(), s.current_player());
        assert_eq!(restored.characters(), s.characters());

        let mut a = s.clone();
        let mut b = restored.clone();
        assert_eq!(a.choose(Direction::Left), b.choose(Direction::Left));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn snapshot_json_shape() {
        let s = session();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "node": "0", "turn": 0, "inventories": [[], []] })
        );
    }

    #[test]
    fn restore_rejects_bad_state_without_changes() {
        let mut s = session();
        let good = s.snapshot();

        let mut bad_turn = good.clone();
        bad_turn.current_player = 5;
        assert!(matches!(
            s.restore(&bad_turn),
            Err(CoreError::TurnOutOfRange { .. })
        ));

        let mut bad_count = good.clone();
        bad_count.inventories.pop();
        assert!(matches!(
            s.restore(&bad_count),
            Err(CoreError::StateMismatch(_))
        ));

        let mut bad_node = good.clone();
        bad_node.current_node = "ghost".into();
        bad_node.inventories[0] = ["X"].into_iter().collect();
        assert!(matches!(
            s.restore(&bad_node),
            Err(CoreError::NodeNotFound(_))
        ));
        assert!(s.current_player().inventory.is_empty());
        assert_eq!(s.snapshot(), good);
    }

    #[test]
    fn restore_reopens_a_finished_session() {
        let mut s = session();
        s.choose(Direction::Left).unwrap();
        let saved = s.snapshot();
        s.choose(Direction::Right).unwrap();
        assert!(s.is_finished());

        s.restore(&saved).unwrap();
        assert!(!s.is_finished());
        assert_eq!(s.current_node_key().as_str(), "SECRET");
        assert_eq!(s.observe_level().unwrap(), None);
    }
}
