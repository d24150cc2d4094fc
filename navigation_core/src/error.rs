//! Error types for queries, sessions, the game service and configuration.

use character_catalog::CharacterId;
use thiserror::Error;

/// A graph query could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("character not found in graph: {0}")]
    NotFound(String),
}

/// A session could not be created, or a move was rejected.
///
/// A rejected move leaves the session unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("character {0} is not one of the current options")]
    InvalidChoice(CharacterId),

    #[error("no choices left: move limit reached")]
    OutOfChoices,

    #[error("destination already reached")]
    AlreadyWon,

    #[error("initial and destination characters must differ")]
    SameEndpoints,

    #[error("node is not part of the graph")]
    UnknownNode,

    #[error("graph needs at least two characters, found {0}")]
    NotEnoughCharacters(usize),
}

/// Errors surfaced by the game service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown session: {0}")]
    UnknownSession(crate::service::SessionId),

    #[error("unknown character id: {0}")]
    UnknownCharacter(CharacterId),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("logger error: {0}")]
    Logger(String),
}
