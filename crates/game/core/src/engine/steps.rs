//! Pure step functions. Each reads the round state and returns the partial
//! update it wants merged; the engine applies updates and records statistics.

use crate::Amount;
use crate::player::Player;
use crate::state::{RoundState, StateUpdate};
use crate::stats::EndCondition;

use super::errors::{GameWarning, Recovered};

/// Result of a player decision step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Decision {
    pub claim: Amount,
    pub update: StateUpdate,
}

/// Result of the aggregator step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Aggregation {
    pub round_total: Amount,
    pub next_pot: Amount,
    pub update: StateUpdate,
}

pub(crate) fn stage_marker(stage: u32) -> String {
    format!("---- Stage {} ----", stage)
}

pub(crate) fn supervisor(state: &RoundState) -> StateUpdate {
    StateUpdate::default().with_message(stage_marker(state.stage_number()))
}

/// Parses untrusted decision text as an integer claim.
///
/// Surrounding whitespace and a leading sign are accepted; anything else is
/// rejected. Negative claims are not range-checked.
pub fn parse_claim(raw: &str) -> Option<Amount> {
    raw.trim().parse().ok()
}

pub(crate) fn decision(player: &Player, raw: &str) -> Recovered<Decision> {
    match parse_claim(raw) {
        Some(claim) => Recovered::ok(claim_update(player, claim)),
        None => Recovered::with_default(
            claim_update(player, 0),
            GameWarning::InvalidDecision {
                player: player.id(),
                name: player.name().to_string(),
                raw: raw.to_string(),
            },
        ),
    }
}

pub(crate) fn provider_failure(player: &Player, reason: String) -> Recovered<Decision> {
    Recovered::with_default(
        claim_update(player, 0),
        GameWarning::ProviderFailed {
            player: player.id(),
            name: player.name().to_string(),
            reason,
        },
    )
}

fn claim_update(player: &Player, claim: Amount) -> Decision {
    Decision {
        claim,
        update: StateUpdate::default()
            .with_message(claim.to_string())
            .with_decision(player.id(), claim),
    }
}

/// Sums the trailing `player_count` messages and computes the next pot.
///
/// Any malformed entry (or a log shorter than one round) voids the whole
/// round total: the pot simply doubles and the stage still advances.
/// Doubling saturates at the [`Amount`] bounds; a clamped pot is reported as
/// [`GameWarning::PotClamped`] unless the round was already malformed.
pub(crate) fn aggregate(state: &RoundState, player_count: usize) -> Recovered<Aggregation> {
    let stage = state.stage_number();
    let next_stage = stage.saturating_add(1);

    match round_total(state.messages(), player_count).and_then(|total| {
        state
            .game_pot()
            .checked_sub(total)
            .map(|remainder| (total, remainder))
            .ok_or_else(|| format!("claims of {} overflow the pot", total))
    }) {
        Ok((total, remainder)) => {
            let next_pot = remainder.saturating_mul(2);
            let aggregation = Aggregation {
                round_total: total,
                next_pot,
                update: StateUpdate::default()
                    .with_players_pot(total)
                    .with_game_pot(next_pot)
                    .with_stage_number(next_stage),
            };
            match remainder.checked_mul(2) {
                Some(_) => Recovered::ok(aggregation),
                None => Recovered::with_default(
                    aggregation,
                    GameWarning::PotClamped {
                        stage,
                        pot: next_pot,
                    },
                ),
            }
        }
        Err(reason) => {
            let next_pot = state.game_pot().saturating_mul(2);
            Recovered::with_default(
                Aggregation {
                    round_total: 0,
                    next_pot,
                    update: StateUpdate::default()
                        .with_players_pot(0)
                        .with_game_pot(next_pot)
                        .with_stage_number(next_stage),
                },
                GameWarning::MalformedRoundClaims { stage, reason },
            )
        }
    }
}

fn round_total(messages: &[String], player_count: usize) -> Result<Amount, String> {
    if messages.len() < player_count {
        return Err(format!(
            "expected {} claims, log holds {} messages",
            player_count,
            messages.len()
        ));
    }

    messages[messages.len() - player_count..]
        .iter()
        .try_fold(0 as Amount, |acc, message| {
            let claim =
                parse_claim(message).ok_or_else(|| format!("{:?} is not an integer", message))?;
            acc.checked_add(claim)
                .ok_or_else(|| "round total overflows".to_string())
        })
}

/// Continuation predicate. `None` means play another round.
///
/// Pot depletion takes priority when both stop conditions hold.
pub fn end_condition(state: &RoundState) -> Option<EndCondition> {
    if state.game_pot() > 0 && state.iterations() > state.stage_number() {
        None
    } else if state.game_pot() <= 0 {
        Some(EndCondition::PotDepleted)
    } else {
        Some(EndCondition::MaxIterations)
    }
}
