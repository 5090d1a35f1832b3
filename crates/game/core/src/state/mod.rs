//! Round state threaded through a single game run.
//!
//! [`RoundState`] is created once from a [`GameConfig`] and mutated only by
//! applying [`StateUpdate`]s through the [`StateReducer`], which carries the
//! per-field combination rules.
mod reducer;
mod update;

pub use reducer::{DecisionsReducer, MessagesReducer, PotReducer, StateReducer};
pub use update::StateUpdate;

use std::collections::BTreeMap;

use crate::Amount;
use crate::config::GameConfig;
use crate::player::{PlayerId, PlayerRegistry};

/// Mutable record of one game run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// Append-only log: stage markers and each player's claim as text.
    messages: Vec<String>,
    /// Per-player claim history, one entry per completed decision.
    player_decisions: BTreeMap<PlayerId, Vec<Amount>>,
    /// Pot available for the upcoming round.
    game_pot: Amount,
    /// Total claimed in the most recently aggregated round.
    players_pot: Amount,
    /// Current round index.
    stage_number: u32,
    /// Round limit, fixed at construction.
    iterations: u32,
}

impl RoundState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            messages: Vec::new(),
            player_decisions: BTreeMap::new(),
            game_pot: config.game_pot,
            players_pot: 0,
            stage_number: config.stage_number,
            iterations: config.iterations,
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn player_decisions(&self) -> &BTreeMap<PlayerId, Vec<Amount>> {
        &self.player_decisions
    }

    /// Claim history for one player; empty before their first decision.
    pub fn decisions_of(&self, player: PlayerId) -> &[Amount] {
        self.player_decisions
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn game_pot(&self) -> Amount {
        self.game_pot
    }

    pub fn players_pot(&self) -> Amount {
        self.players_pot
    }

    pub fn stage_number(&self) -> u32 {
        self.stage_number
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Rounds remaining before the limit, as shown to players.
    pub fn stages_left(&self) -> i64 {
        i64::from(self.iterations) - i64::from(self.stage_number)
    }

    /// Full histories of every registered player except `player`, in registry order.
    pub fn previous_decisions_view<'a>(
        &'a self,
        registry: &'a PlayerRegistry,
        player: PlayerId,
    ) -> impl Iterator<Item = (PlayerId, &'a [Amount])> + 'a {
        registry
            .ids()
            .filter(move |&other| other != player)
            .map(move |other| (other, self.decisions_of(other)))
    }

    /// Renders [`Self::previous_decisions_view`] as `Player <id>: [c1, c2]` lines.
    pub fn render_previous_decisions(
        &self,
        registry: &PlayerRegistry,
        player: PlayerId,
    ) -> String {
        self.previous_decisions_view(registry, player)
            .map(|(other, claims)| format!("Player {}: {:?}", other, claims))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Applies a partial update using the per-field merge rules.
    pub fn apply(&mut self, update: StateUpdate) {
        StateReducer::new(self).apply(update);
    }
}

impl From<&GameConfig> for RoundState {
    fn from(config: &GameConfig) -> Self {
        Self::new(config)
    }
}
