//! Injectable sink for recovered warnings and per-round snapshots.

use crate::Amount;
use crate::player::PlayerId;
use crate::state::RoundState;
use crate::stats::EndCondition;

use super::errors::GameWarning;

/// What happened in one completed round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    /// Stage number announced by this round's supervisor step.
    pub stage: u32,
    /// Claims in the order they were recorded.
    pub claims: Vec<(PlayerId, Amount)>,
    pub round_total: Amount,
    /// Pot carried into the next round (already doubled).
    pub game_pot: Amount,
    /// Set when this round ended the game.
    pub end_condition: Option<EndCondition>,
}

impl RoundReport {
    pub fn is_final(&self) -> bool {
        self.end_condition.is_some()
    }
}

/// Full state after a round, as streamed to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundSnapshot {
    pub report: RoundReport,
    pub state: RoundState,
}

/// Receives everything the engine reports without failing.
///
/// Implementations must not block: they are called inline from the engine.
pub trait GameObserver: Send + Sync {
    fn on_warning(&self, warning: &GameWarning);

    fn on_round(&self, _snapshot: &RoundSnapshot) {}
}

/// Observer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {
    fn on_warning(&self, _warning: &GameWarning) {}
}
