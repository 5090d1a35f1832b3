use std::collections::BTreeMap;

use super::{RoundState, StateUpdate};
use crate::Amount;
use crate::player::PlayerId;

/// Wraps mutable access to [`RoundState`] with one sub-reducer per merge rule.
pub struct StateReducer<'a> {
    state: &'a mut RoundState,
}

impl<'a> StateReducer<'a> {
    pub fn new(state: &'a mut RoundState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &RoundState {
        self.state
    }

    /// Folds every field of `update` into the state.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            messages,
            player_decisions,
            game_pot,
            players_pot,
            stage_number,
        } = update;

        self.messages().append(messages);
        self.decisions().merge(player_decisions);

        let mut pot = self.pot();
        if let Some(value) = game_pot {
            pot.set_game_pot(value);
        }
        if let Some(value) = players_pot {
            pot.set_players_pot(value);
        }
        if let Some(value) = stage_number {
            pot.set_stage_number(value);
        }
    }

    pub fn messages(&mut self) -> MessagesReducer<'_> {
        MessagesReducer {
            messages: &mut self.state.messages,
        }
    }

    pub fn decisions(&mut self) -> DecisionsReducer<'_> {
        DecisionsReducer {
            decisions: &mut self.state.player_decisions,
        }
    }

    pub fn pot(&mut self) -> PotReducer<'_> {
        PotReducer { state: self.state }
    }
}

/// Append-only access to the message log.
pub struct MessagesReducer<'a> {
    messages: &'a mut Vec<String>,
}

impl MessagesReducer<'_> {
    pub fn append(&mut self, messages: impl IntoIterator<Item = String>) {
        self.messages.extend(messages);
    }
}

/// Key-wise union of decision histories; existing entries are never replaced.
pub struct DecisionsReducer<'a> {
    decisions: &'a mut BTreeMap<PlayerId, Vec<Amount>>,
}

impl DecisionsReducer<'_> {
    pub fn merge(&mut self, incoming: BTreeMap<PlayerId, Vec<Amount>>) {
        for (player, claims) in incoming {
            self.decisions.entry(player).or_default().extend(claims);
        }
    }
}

/// Overwrite access to the scalar round fields.
pub struct PotReducer<'a> {
    state: &'a mut RoundState,
}

impl PotReducer<'_> {
    pub fn set_game_pot(&mut self, game_pot: Amount) {
        self.state.game_pot = game_pot;
    }

    pub fn set_players_pot(&mut self, players_pot: Amount) {
        self.state.players_pot = players_pot;
    }

    pub fn set_stage_number(&mut self, stage_number: u32) {
        self.state.stage_number = stage_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn state() -> RoundState {
        RoundState::new(&GameConfig::new(100, 8))
    }

    #[test]
    fn messages_append_in_order() {
        let mut state = state();
        state.apply(StateUpdate::default().with_message("a"));
        state.apply(StateUpdate::default().with_message("b").with_message("c"));
        assert_eq!(state.messages(), ["a", "b", "c"]);
    }

    #[test]
    fn decisions_union_with_append() {
        let mut state = state();
        state.apply(StateUpdate::default().with_decision(PlayerId(1), 5));
        state.apply(StateUpdate::default().with_decision(PlayerId(2), 7));
        state.apply(StateUpdate::default().with_decision(PlayerId(1), 9));

        assert_eq!(state.decisions_of(PlayerId(1)), [5, 9]);
        assert_eq!(state.decisions_of(PlayerId(2)), [7]);
    }

    #[test]
    fn disjoint_decision_updates_commute() {
        let first = StateUpdate::default().with_decision(PlayerId(1), 3);
        let second = StateUpdate::default().with_decision(PlayerId(2), 4);

        let mut forward = state();
        forward.apply(first.clone());
        forward.apply(second.clone());

        let mut backward = state();
        backward.apply(second);
        backward.apply(first);

        assert_eq!(forward.player_decisions(), backward.player_decisions());
    }

    #[test]
    fn scalars_overwrite_only_when_present() {
        let mut state = state();
        state.apply(
            StateUpdate::default()
                .with_game_pot(40)
                .with_players_pot(30)
                .with_stage_number(2),
        );
        assert_eq!(state.game_pot(), 40);
        assert_eq!(state.players_pot(), 30);
        assert_eq!(state.stage_number(), 2);

        state.apply(StateUpdate::default().with_players_pot(0));
        assert_eq!(state.game_pot(), 40);
        assert_eq!(state.players_pot(), 0);
        assert_eq!(state.stage_number(), 2);
        assert_eq!(state.iterations(), 8);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut state = state();
        let before = state.clone();
        let update = StateUpdate::default();
        assert!(update.is_empty());
        state.apply(update);
        assert_eq!(state, before);
    }
}
