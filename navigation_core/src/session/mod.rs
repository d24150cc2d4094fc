//! Navigation sessions - one player's walk from an initial to a destination
//! character.
//!
//! A session moves through three states:
//! 1. **Active**: the player picks one of the current character's strongest
//!    connections each turn
//! 2. **Won**: the current character is the destination
//! 3. **Exhausted**: the move limit was reached without winning
//!
//! `Won` and `Exhausted` are terminal; further moves are rejected and leave
//! the session untouched.

mod picker;

pub use picker::*;

use character_catalog::CharacterId;
use petgraph::graph::NodeIndex;
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{QueryError, SessionError};
use crate::relationship_graph::{GraphNode, RelationshipGraph};

/// Number of move options offered each turn.
pub const OPTION_COUNT: usize = 5;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Won,
    Exhausted,
}

impl SessionState {
    /// Whether the session accepts no further moves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Active)
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The move reached the destination.
    Won,
    /// The destination is still ahead. The session may now be exhausted.
    Continuing,
}

/// A navigation session over a shared, read-only graph.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    graph: Arc<RelationshipGraph>,
    initial: NodeIndex,
    destination: NodeIndex,
    current: NodeIndex,
    moves_taken: u32,
    /// `None` = unlimited.
    move_limit: Option<u32>,
}

impl NavigationSession {
    /// Create a session between two known nodes.
    pub fn new(
        graph: Arc<RelationshipGraph>,
        initial: NodeIndex,
        destination: NodeIndex,
        move_limit: Option<u32>,
    ) -> Result<Self, SessionError> {
        if graph.node(initial).is_none() || graph.node(destination).is_none() {
            return Err(SessionError::UnknownNode);
        }
        if initial == destination {
            return Err(SessionError::SameEndpoints);
        }

        info!(
            initial = %graph[initial].name,
            destination = %graph[destination].name,
            move_limit = ?move_limit,
            "session started"
        );

        Ok(Self {
            graph,
            initial,
            destination,
            current: initial,
            moves_taken: 0,
            move_limit,
        })
    }

    /// Create a session, letting `picker` choose any endpoint not given.
    pub fn start(
        graph: Arc<RelationshipGraph>,
        picker: &mut dyn EndpointPicker,
        initial: Option<NodeIndex>,
        destination: Option<NodeIndex>,
        move_limit: Option<u32>,
    ) -> Result<Self, SessionError> {
        let not_enough = || SessionError::NotEnoughCharacters(graph.node_count());

        let initial = match initial {
            Some(idx) => idx,
            None => picker.pick(&graph, destination).ok_or_else(not_enough)?,
        };
        let destination = match destination {
            Some(idx) => idx,
            None => picker.pick(&graph, Some(initial)).ok_or_else(not_enough)?,
        };

        Self::new(graph, initial, destination, move_limit)
    }

    /// The graph this session walks.
    pub fn graph(&self) -> &Arc<RelationshipGraph> {
        &self.graph
    }

    pub fn initial(&self) -> &GraphNode {
        &self.graph[self.initial]
    }

    pub fn destination(&self) -> &GraphNode {
        &self.graph[self.destination]
    }

    pub fn current(&self) -> &GraphNode {
        &self.graph[self.current]
    }

    pub fn moves_taken(&self) -> u32 {
        self.moves_taken
    }

    pub fn move_limit(&self) -> Option<u32> {
        self.move_limit
    }

    /// Moves left before the session is exhausted, `None` if unlimited.
    pub fn remaining_moves(&self) -> Option<u32> {
        self.move_limit
            .map(|limit| limit.saturating_sub(self.moves_taken))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.current == self.destination {
            SessionState::Won
        } else if self.remaining_moves() == Some(0) {
            SessionState::Exhausted
        } else {
            SessionState::Active
        }
    }

    /// The current character's strongest connections, at most [`OPTION_COUNT`].
    pub fn options(&self) -> Vec<&GraphNode> {
        self.option_indices()
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect()
    }

    fn option_indices(&self) -> Vec<NodeIndex> {
        let current = &self.graph[self.current].name;
        match self.graph.top_connections(current, OPTION_COUNT) {
            Ok(connections) => connections
                .iter()
                .filter_map(|c| self.graph.find_node(&c.name))
                .collect(),
            Err(QueryError::NotFound(name)) => {
                warn!(name = %name, "current character missing from graph");
                Vec::new()
            }
        }
    }

    /// Move to the option with the given id.
    ///
    /// Rejected moves leave the session unchanged: a terminal session fails
    /// with [`SessionError::OutOfChoices`] or [`SessionError::AlreadyWon`], and
    /// an id outside the current options fails with
    /// [`SessionError::InvalidChoice`].
    pub fn apply_move(&mut self, chosen: CharacterId) -> Result<MoveOutcome, SessionError> {
        match self.state() {
            SessionState::Won => return Err(SessionError::AlreadyWon),
            SessionState::Exhausted => return Err(SessionError::OutOfChoices),
            SessionState::Active => {}
        }

        let next = self
            .option_indices()
            .into_iter()
            .find(|idx| self.graph[*idx].id == chosen)
            .ok_or(SessionError::InvalidChoice(chosen))?;

        self.moves_taken += 1;
        self.current = next;
        debug!(
            current = %self.graph[next].name,
            moves_taken = self.moves_taken,
            "move applied"
        );

        if self.current == self.destination {
            info!(moves_taken = self.moves_taken, "destination reached");
            Ok(MoveOutcome::Won)
        } else {
            if self.state() == SessionState::Exhausted {
                info!(moves_taken = self.moves_taken, "move limit reached");
            }
            Ok(MoveOutcome::Continuing)
        }
    }

    /// `k` independent, uniformly random characters (duplicates possible).
    pub fn random_characters(&self, rng: &mut impl RngCore, k: usize) -> Vec<&GraphNode> {
        let count = self.graph.node_count();
        if count == 0 {
            return Vec::new();
        }

        (0..k)
            .filter_map(|_| self.graph.node_at(uniform_index(rng, count)))
            .map(|idx| &self.graph[idx])
            .collect()
    }
}
