//! Resolving a directional move against a player's inventory.
//!
//! Resolution is a pure function of `(graph, position, direction,
//! inventory)`. [`Cursor`] pairs it with a borrowed position so there is a
//! single owner of "where play stands": whoever lends the `&mut NodeKey`
//! (normally the [`GameSession`](crate::GameSession)).

use log::debug;

use crate::character::Inventory;
use crate::error::{CoreError, CoreResult};
use crate::graph::ChoiceGraph;
use crate::node::{ChoiceNode, Destination, Direction, NodeKey, Transition};

/// Result of a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'g> {
    /// Play continues at this node.
    Continues(&'g ChoiceNode),
    /// The transition left the graph; route to an exit flow.
    ExitsGraph,
}

impl<'g> Outcome<'g> {
    /// The destination node, unless the graph was left.
    pub fn node(&self) -> Option<&'g ChoiceNode> {
        match *self {
            Outcome::Continues(node) => Some(node),
            Outcome::ExitsGraph => None,
        }
    }
}

/// First transition whose requirements are all in `inventory`.
pub fn first_satisfied<'t>(
    transitions: &'t [Transition],
    inventory: &Inventory,
) -> Option<&'t Transition> {
    transitions.iter().find(|t| t.is_satisfied_by(inventory))
}

/// Decide where a move from `position` leads, without changing anything.
///
/// Fails with [`CoreError::NodeNotFound`] if `position` or the chosen
/// destination is missing, and with [`CoreError::NoAvailablePath`] if no
/// transition on that side is satisfied.
pub fn resolve<'g>(
    graph: &'g ChoiceGraph,
    position: &NodeKey,
    direction: Direction,
    inventory: &Inventory,
) -> CoreResult<Outcome<'g>> {
    let node = graph.get(position)?;
    let transition = first_satisfied(&node.branch(direction).transitions, inventory).ok_or_else(
        || CoreError::NoAvailablePath {
            position: position.clone(),
            direction,
        },
    )?;

    match &transition.destination {
        Destination::Exit => {
            debug!("{position} ({direction}) -> EXIT");
            Ok(Outcome::ExitsGraph)
        }
        Destination::Node(key) => {
            let next = graph.get(key)?;
            debug!("{position} ({direction}) -> {key}");
            Ok(Outcome::Continues(next))
        }
    }
}

/// A traversal pointer into a graph over a borrowed position.
#[derive(Debug)]
pub struct Cursor<'g, 'p> {
    graph: &'g ChoiceGraph,
    position: &'p mut NodeKey,
}

impl<'g, 'p> Cursor<'g, 'p> {
    /// Create a cursor over `graph` that moves `position`.
    pub fn new(graph: &'g ChoiceGraph, position: &'p mut NodeKey) -> Self {
        Self { graph, position }
    }

    /// Current position.
    pub fn position(&self) -> &NodeKey {
        self.position
    }

    /// The node at the current position.
    pub fn current(&self) -> CoreResult<&'g ChoiceNode> {
        self.graph.get(self.position)
    }

    /// Move in `direction`. The position changes only when play continues
    /// at another node; on error or exit it stays where it was.
    pub fn resolve(
        &mut self,
        direction: Direction,
        inventory: &Inventory,
    ) -> CoreResult<Outcome<'g>> {
        let outcome = resolve(self.graph, self.position, direction, inventory)?;
        if let Outcome::Continues(next) = outcome {
            *self.position = next.key.clone();
        }
        Ok(outcome)
    }

    /// Whether the current node has any transition on either side.
    pub fn has_pending_choices(&self) -> CoreResult<bool> {
        Ok(self.current()?.has_transitions())
    }
}
