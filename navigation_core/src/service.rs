//! Game service - the four game operations over many concurrent sessions.
//!
//! All sessions share one read-only graph. Each session sits behind its own
//! mutex so one player's moves never block another's.

use character_catalog::CharacterId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::relationship_graph::{GraphNode, RelationshipGraph};
use crate::session::{
    EndpointPicker, MoveOutcome, NavigationSession, SessionState, UniformPicker,
};

/// Unique identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public view of a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub images: serde_json::Value,
}

impl From<&GraphNode> for CharacterSummary {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            images: node.images.clone(),
        }
    }
}

/// Response to [`GameService::start_session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStarted {
    pub session_id: SessionId,
    pub initial: CharacterSummary,
    pub destination: CharacterSummary,
}

/// Response to [`GameService::choose_next`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub current: CharacterSummary,
    pub reached_destination: bool,
    pub moves_taken: u32,
}

/// Response to [`GameService::get_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub initial: CharacterSummary,
    pub current: CharacterSummary,
    pub destination: CharacterSummary,
    pub moves_taken: u32,
    pub move_limit: Option<u32>,
    pub state: SessionState,
}

type SharedSession = Arc<Mutex<NavigationSession>>;

/// The game service.
pub struct GameService {
    graph: Arc<RelationshipGraph>,
    move_limit: Option<u32>,
    picker: Mutex<Box<dyn EndpointPicker>>,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl GameService {
    /// Create a service that picks missing endpoints uniformly at random.
    pub fn new(graph: Arc<RelationshipGraph>, move_limit: Option<u32>) -> Self {
        Self::with_picker(graph, move_limit, UniformPicker::from_entropy())
    }

    /// Create a service with a custom endpoint picker.
    pub fn with_picker(
        graph: Arc<RelationshipGraph>,
        move_limit: Option<u32>,
        picker: impl EndpointPicker + 'static,
    ) -> Self {
        Self {
            graph,
            move_limit,
            picker: Mutex::new(Box::new(picker)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The shared graph.
    pub fn graph(&self) -> &Arc<RelationshipGraph> {
        &self.graph
    }

    /// Start a new session. Endpoints not given are picked.
    pub fn start_session(
        &self,
        initial_id: Option<CharacterId>,
        destination_id: Option<CharacterId>,
    ) -> Result<SessionStarted, ServiceError> {
        let initial = initial_id.map(|id| self.resolve(id)).transpose()?;
        let destination = destination_id.map(|id| self.resolve(id)).transpose()?;

        let session = {
            let mut picker = self.picker.lock();
            NavigationSession::start(
                Arc::clone(&self.graph),
                picker.as_mut(),
                initial,
                destination,
                self.move_limit,
            )?
        };

        let session_id = SessionId::new();
        let started = SessionStarted {
            session_id,
            initial: session.initial().into(),
            destination: session.destination().into(),
        };

        self.sessions
            .write()
            .insert(session_id, Arc::new(Mutex::new(session)));
        info!(%session_id, "session registered");

        Ok(started)
    }

    /// Up to five characters the session can move to next.
    pub fn get_options(&self, session_id: SessionId) -> Result<Vec<CharacterSummary>, ServiceError> {
        let session = self.session(session_id)?;
        let session = session.lock();
        Ok(session.options().into_iter().map(Into::into).collect())
    }

    /// Move the session to the chosen character.
    pub fn choose_next(
        &self,
        session_id: SessionId,
        character_id: CharacterId,
    ) -> Result<MoveReport, ServiceError> {
        let session = self.session(session_id)?;
        let mut session = session.lock();
        let outcome = session.apply_move(character_id)?;

        Ok(MoveReport {
            current: session.current().into(),
            reached_destination: outcome == MoveOutcome::Won,
            moves_taken: session.moves_taken(),
        })
    }

    /// Snapshot of a session.
    pub fn get_status(&self, session_id: SessionId) -> Result<SessionStatus, ServiceError> {
        let session = self.session(session_id)?;
        let session = session.lock();

        Ok(SessionStatus {
            initial: session.initial().into(),
            current: session.current().into(),
            destination: session.destination().into(),
            moves_taken: session.moves_taken(),
            move_limit: session.move_limit(),
            state: session.state(),
        })
    }

    /// Drop a session. Returns whether it existed.
    pub fn end_session(&self, session_id: SessionId) -> bool {
        self.sessions.write().remove(&session_id).is_some()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn session(&self, session_id: SessionId) -> Result<SharedSession, ServiceError> {
        self.sessions
            .read()
            .get(&session_id)
            .cloned()
            .ok_or(ServiceError::UnknownSession(session_id))
    }

    fn resolve(&self, id: CharacterId) -> Result<petgraph::graph::NodeIndex, ServiceError> {
        self.graph
            .find_by_id(id)
            .ok_or(ServiceError::UnknownCharacter(id))
    }
}
