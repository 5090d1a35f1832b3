//! Deterministic round engine for the shared-pot game.
//!
//! `pot-core` defines the canonical rules (player registry, round state, phase
//! machine, statistics) and exposes pure APIs that the async runtime drives.
//! All state mutation flows through [`engine::GameEngine`], which applies the
//! partial updates produced by each step via the per-field reducer in
//! [`state`].
pub mod config;
pub mod engine;
pub mod player;
pub mod state;
pub mod stats;

pub use config::GameConfig;
pub use engine::{
    EngineError, GameEngine, GameObserver, GameWarning, NoopObserver, Phase, Recovered,
    RoundReport, RoundSnapshot, Signal, StepResult, Topology,
};
pub use player::{
    Player, PlayerId, PlayerRegistry, PromptContext, PromptError, PromptSlot, PromptTemplate,
    RegistryError,
};
pub use state::{RoundState, StateReducer, StateUpdate};
pub use stats::{EndCondition, GameReport, GameStatistics, GameSummary, PlayerSummary};

/// Integer amount used for claims and pot values.
///
/// Signed because the pot may go negative for the instant between the
/// aggregator step and the continuation check.
pub type Amount = i64;
