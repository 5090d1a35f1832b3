//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, provider resolution, and worker
//! coordination so clients can bubble them up with consistent context.
use pot_core::{EngineError, PlayerId, RegistryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("no decision provider bound for player {player}")]
    ProviderNotSet { player: PlayerId },

    /// Returned by providers, or raised when a provider call panics; the runtime
    /// records it as a zero claim.
    #[error("decision provider error: {0}")]
    Provider(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("game has already finished")]
    GameFinished,
}

impl From<RegistryError> for RuntimeError {
    fn from(err: RegistryError) -> Self {
        RuntimeError::Engine(EngineError::Registry(err))
    }
}
