use std::collections::BTreeMap;

use crate::Amount;
use crate::player::PlayerId;

/// Partial update returned by an engine step.
///
/// Each field carries its own combination rule, applied by
/// [`super::StateReducer`]:
///
/// | field              | rule                                   |
/// |--------------------|----------------------------------------|
/// | `messages`         | append in order                        |
/// | `player_decisions` | key-wise union, append to each list    |
/// | `game_pot`         | overwrite when `Some`                  |
/// | `players_pot`      | overwrite when `Some`                  |
/// | `stage_number`     | overwrite when `Some`                  |
///
/// `iterations` has no entry: it is fixed for the whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateUpdate {
    pub messages: Vec<String>,
    pub player_decisions: BTreeMap<PlayerId, Vec<Amount>>,
    pub game_pot: Option<Amount>,
    pub players_pot: Option<Amount>,
    pub stage_number: Option<u32>,
}

impl StateUpdate {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn with_decision(mut self, player: PlayerId, claim: Amount) -> Self {
        self.player_decisions.entry(player).or_default().push(claim);
        self
    }

    pub fn with_game_pot(mut self, game_pot: Amount) -> Self {
        self.game_pot = Some(game_pot);
        self
    }

    pub fn with_players_pot(mut self, players_pot: Amount) -> Self {
        self.players_pot = Some(players_pot);
        self
    }

    pub fn with_stage_number(mut self, stage_number: u32) -> Self {
        self.stage_number = Some(stage_number);
        self
    }

    /// True if applying this update would leave the state unchanged.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.player_decisions.values().all(Vec::is_empty)
            && self.game_pot.is_none()
            && self.players_pot.is_none()
            && self.stage_number.is_none()
    }
}
