//! Fatal engine errors and recovered-with-default outcomes.
//!
//! The engine splits failures in two. [`EngineError`] is fatal: it signals a
//! configuration or sequencing mistake by the caller and aborts the run.
//! [`GameWarning`] is recovered: the step substitutes a default, reports the
//! warning to the observer, and the round continues.

use crate::Amount;
use crate::player::{PlayerId, RegistryError};

use super::phase::{Phase, Signal};

/// Errors that abort a game run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("round topology not compiled; call compile() before running the game")]
    TopologyNotCompiled,

    #[error("no transition from {phase} on {signal}")]
    InvalidTransition { phase: Phase, signal: Signal },

    #[error("step requires phase {expected}, engine is in {actual}")]
    PhaseMismatch { expected: Phase, actual: Phase },

    #[error("player {player} is not registered")]
    UnknownPlayer { player: PlayerId },

    #[error("player {player} already decided in stage {stage}")]
    DuplicateDecision { player: PlayerId, stage: u32 },
}

/// Conditions recovered with a default value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameWarning {
    #[error("{name} made invalid decision: {raw:?}")]
    InvalidDecision {
        player: PlayerId,
        name: String,
        raw: String,
    },

    #[error("decision provider for {name} failed: {reason}")]
    ProviderFailed {
        player: PlayerId,
        name: String,
        reason: String,
    },

    #[error("invalid decision format in aggregator at stage {stage}: {reason}")]
    MalformedRoundClaims { stage: u32, reason: String },

    #[error("pot doubling overflowed at stage {stage}; clamped to {pot}")]
    PotClamped { stage: u32, pot: Amount },

    #[error("getting statistics for incomplete game")]
    IncompleteGame,
}

/// A value that may have been substituted for a failed computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovered<T> {
    value: T,
    warning: Option<GameWarning>,
}

impl<T> Recovered<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    pub fn with_default(value: T, warning: GameWarning) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    /// True if `value` is a default standing in for a failure.
    pub fn is_recovered(&self) -> bool {
        self.warning.is_some()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn warning(&self) -> Option<&GameWarning> {
        self.warning.as_ref()
    }

    pub fn into_parts(self) -> (T, Option<GameWarning>) {
        (self.value, self.warning)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Recovered<U> {
        Recovered {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

/// Step result: fatal error, or a possibly-recovered value.
pub type StepResult<T> = Result<Recovered<T>, EngineError>;
