use std::collections::BTreeMap;

use super::{EndCondition, GameStatistics};
use crate::Amount;
use crate::player::PlayerId;

/// Result of [`GameStatistics::compute_summary`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum GameSummary {
    /// Placeholder returned while the game is still running.
    Pending { status: String },
    Completed(GameReport),
}

impl GameSummary {
    pub const PENDING_STATUS: &'static str = "Game not completed";

    pub fn report(&self) -> Option<&GameReport> {
        match self {
            GameSummary::Completed(report) => Some(report),
            GameSummary::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GameSummary::Pending { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameReport {
    pub rounds_played: u32,
    pub total_claimed: Amount,
    pub end_condition: EndCondition,
    pub average_claimed_per_round: f64,
    pub player_statistics: BTreeMap<PlayerId, PlayerSummary>,
    pub final_pot: Amount,
    pub resource_depletion_rate: f64,
    pub round_totals: Vec<Amount>,
    pub pot_history: Vec<Amount>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerSummary {
    pub total_claimed: Amount,
    pub average_claim: f64,
    pub max_claim: Amount,
    pub min_claim: Amount,
    /// Population standard deviation; 0 with fewer than two claims.
    pub std_claim: f64,
    pub decisions_by_round: Vec<Amount>,
}

impl PlayerSummary {
    pub fn from_claims(claims: &[Amount]) -> Self {
        let total: Amount = claims.iter().fold(0, |acc, &c| acc.saturating_add(c));
        let mean = if claims.is_empty() {
            0.0
        } else {
            claims.iter().map(|&c| c as f64).sum::<f64>() / claims.len() as f64
        };
        let std_claim = if claims.len() > 1 {
            let variance = claims
                .iter()
                .map(|&c| {
                    let diff = c as f64 - mean;
                    diff * diff
                })
                .sum::<f64>()
                / claims.len() as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Self {
            total_claimed: total,
            average_claim: mean,
            max_claim: claims.iter().copied().max().unwrap_or(0),
            min_claim: claims.iter().copied().min().unwrap_or(0),
            std_claim,
            decisions_by_round: claims.to_vec(),
        }
    }
}

impl GameStatistics {
    /// Builds the end-of-game report.
    ///
    /// Returns [`GameSummary::Pending`] until the game has completed. Reading
    /// the summary never mutates the statistics.
    pub fn compute_summary(&self) -> GameSummary {
        if !self.game_completed {
            return GameSummary::Pending {
                status: GameSummary::PENDING_STATUS.to_string(),
            };
        }

        let average = if self.rounds_played > 0 {
            self.total_claimed as f64 / f64::from(self.rounds_played)
        } else {
            0.0
        };

        GameSummary::Completed(GameReport {
            rounds_played: self.rounds_played,
            total_claimed: self.total_claimed,
            end_condition: self.end_condition,
            average_claimed_per_round: average,
            player_statistics: self
                .player_claims
                .iter()
                .map(|(&player, claims)| (player, PlayerSummary::from_claims(claims)))
                .collect(),
            final_pot: self.final_pot,
            resource_depletion_rate: average,
            round_totals: self.round_totals.clone(),
            pot_history: self.pot_history.clone(),
        })
    }
}
