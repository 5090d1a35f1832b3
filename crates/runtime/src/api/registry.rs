//! Provider registry mapping players to decision providers.
//!
//! Resolution order is: explicit player binding, then the default provider.
//! Providers are stored behind `Arc` so one instance can be shared across
//! players and cloned into concurrent decision tasks.

use std::collections::HashMap;
use std::sync::Arc;

use pot_core::PlayerId;

use super::{DecisionProvider, Result, RuntimeError};

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    bindings: HashMap<PlayerId, Arc<dyn DecisionProvider>>,
    default: Option<Arc<dyn DecisionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `player` to `provider`, replacing any previous binding.
    pub fn bind(&mut self, player: PlayerId, provider: impl DecisionProvider + 'static) {
        self.bind_shared(player, Arc::new(provider));
    }

    /// Binds `player` to an already shared provider instance.
    pub fn bind_shared(&mut self, player: PlayerId, provider: Arc<dyn DecisionProvider>) {
        self.bindings.insert(player, provider);
    }

    /// Removes the binding for `player`, reverting it to the default.
    pub fn unbind(&mut self, player: PlayerId) -> Option<Arc<dyn DecisionProvider>> {
        self.bindings.remove(&player)
    }

    /// Sets the provider used for players without an explicit binding.
    pub fn set_default(&mut self, provider: impl DecisionProvider + 'static) {
        self.default = Some(Arc::new(provider));
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_bound(&self, player: PlayerId) -> bool {
        self.bindings.contains_key(&player)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Resolves the provider for `player`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::ProviderNotSet` if the player is unbound and no
    /// default provider is registered.
    pub fn get_for_player(&self, player: PlayerId) -> Result<Arc<dyn DecisionProvider>> {
        self.bindings
            .get(&player)
            .or(self.default.as_ref())
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { player })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixedDecisionProvider;

    #[test]
    fn falls_back_to_default() {
        let mut registry = ProviderRegistry::new();
        assert!(matches!(
            registry.get_for_player(PlayerId(1)),
            Err(RuntimeError::ProviderNotSet { player: PlayerId(1) })
        ));

        registry.set_default(FixedDecisionProvider::new("0"));
        assert!(registry.get_for_player(PlayerId(1)).is_ok());
        assert!(!registry.is_bound(PlayerId(1)));
    }

    #[test]
    fn binding_overrides_default() {
        let mut registry = ProviderRegistry::new();
        registry.bind(PlayerId(2), FixedDecisionProvider::new("7"));
        assert!(registry.is_bound(PlayerId(2)));
        assert_eq!(registry.binding_count(), 1);
        assert!(registry.get_for_player(PlayerId(3)).is_err());

        assert!(registry.unbind(PlayerId(2)).is_some());
        assert!(registry.get_for_player(PlayerId(2)).is_err());
    }
}
