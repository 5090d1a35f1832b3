//! Incremental game statistics.
//!
//! [`GameStatistics`] is owned by the engine and updated as a side effect of
//! each step; nothing is recomputed from the round state afterwards. The
//! summary becomes available once the continuation predicate has ended the
//! game.
mod summary;

pub use summary::{GameReport, GameSummary, PlayerSummary};

use std::collections::BTreeMap;

use crate::Amount;
use crate::player::PlayerId;

/// Why the game stopped.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndCondition {
    PotDepleted,
    MaxIterations,
    #[default]
    Ongoing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameStatistics {
    rounds_played: u32,
    total_claimed: Amount,
    player_claims: BTreeMap<PlayerId, Vec<Amount>>,
    final_pot: Amount,
    game_completed: bool,
    end_condition: EndCondition,
    /// Aggregated claim total of each round.
    round_totals: Vec<Amount>,
    /// Starting pot followed by the doubled pot after every round.
    pot_history: Vec<Amount>,
}

impl GameStatistics {
    pub fn new(initial_pot: Amount) -> Self {
        Self {
            pot_history: vec![initial_pot],
            ..Self::default()
        }
    }

    pub(crate) fn record_round_started(&mut self) {
        self.rounds_played += 1;
    }

    pub(crate) fn record_claim(&mut self, player: PlayerId, claim: Amount) {
        self.player_claims.entry(player).or_default().push(claim);
    }

    pub(crate) fn record_aggregation(&mut self, round_total: Amount, next_pot: Amount) {
        self.total_claimed = self.total_claimed.saturating_add(round_total);
        self.final_pot = next_pot;
        self.round_totals.push(round_total);
        self.pot_history.push(next_pot);
    }

    pub(crate) fn record_completion(&mut self, end_condition: EndCondition) {
        self.game_completed = true;
        self.end_condition = end_condition;
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn total_claimed(&self) -> Amount {
        self.total_claimed
    }

    pub fn player_claims(&self) -> &BTreeMap<PlayerId, Vec<Amount>> {
        &self.player_claims
    }

    /// Pot computed by the most recent aggregator step, including the
    /// round that ended the game.
    pub fn final_pot(&self) -> Amount {
        self.final_pot
    }

    pub fn game_completed(&self) -> bool {
        self.game_completed
    }

    pub fn end_condition(&self) -> EndCondition {
        self.end_condition
    }

    pub fn round_totals(&self) -> &[Amount] {
        &self.round_totals
    }

    pub fn pot_history(&self) -> &[Amount] {
        &self.pot_history
    }
}
