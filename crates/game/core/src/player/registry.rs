//! Validated, immutable collection of players.
//!
//! Iteration order is the order players were supplied in, which is also the
//! order their claims land in the message log each round.

use std::collections::HashMap;

use super::{Player, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("at least one player must be provided")]
    Empty,

    #[error("player ids must be unique: {id} was registered more than once")]
    DuplicateId { id: PlayerId },

    #[error("player id must be a positive integer (got {id})")]
    NonPositiveId { id: PlayerId },
}

#[derive(Clone, Debug)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerRegistry {
    /// Validates and freezes the player list.
    ///
    /// # Errors
    ///
    /// Fails if `players` is empty, contains id 0, or repeats an id.
    pub fn new(players: Vec<Player>) -> Result<Self, RegistryError> {
        if players.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut index = HashMap::with_capacity(players.len());
        for (position, player) in players.iter().enumerate() {
            if player.id().0 == 0 {
                return Err(RegistryError::NonPositiveId { id: player.id() });
            }
            if index.insert(player.id(), position).is_some() {
                return Err(RegistryError::DuplicateId { id: player.id() });
            }
        }

        Ok(Self { players, index })
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&position| &self.players[position])
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Players in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(Player::id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl<'a> IntoIterator for &'a PlayerRegistry {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::player::PromptTemplate;

    fn player(id: u32) -> Player {
        let template = Arc::new(PromptTemplate::new("{profile}").unwrap());
        Player::new(id, format!("profile {id}"), template)
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(
            PlayerRegistry::new(Vec::new()).unwrap_err(),
            RegistryError::Empty
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = PlayerRegistry::new(vec![player(1), player(2), player(1)]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId { id: PlayerId(1) });
    }

    #[test]
    fn zero_id_is_rejected() {
        let err = PlayerRegistry::new(vec![player(0)]).unwrap_err();
        assert_eq!(err, RegistryError::NonPositiveId { id: PlayerId(0) });
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let registry = PlayerRegistry::new(vec![player(3), player(1), player(2)]).unwrap();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec![PlayerId(3), PlayerId(1), PlayerId(2)]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn lookup_by_id() {
        let registry = PlayerRegistry::new(vec![player(5), player(9)]).unwrap();
        assert_eq!(registry.get(PlayerId(9)).map(Player::profile), Some("profile 9"));
        assert!(registry.get(PlayerId(4)).is_none());
        assert!(registry.contains(PlayerId(5)));
    }
}
