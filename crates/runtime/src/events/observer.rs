use pot_core::{GameObserver, GameWarning, RoundSnapshot};

use super::bus::{Event, EventBus};

/// Engine observer that logs and republishes onto an [`EventBus`].
#[derive(Clone)]
pub struct EventBusObserver {
    bus: EventBus,
}

impl EventBusObserver {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl GameObserver for EventBusObserver {
    fn on_warning(&self, warning: &GameWarning) {
        tracing::warn!("{}", warning);
        self.bus.publish(Event::Warning(warning.clone()));
    }

    fn on_round(&self, snapshot: &RoundSnapshot) {
        let report = &snapshot.report;
        tracing::info!(
            stage = report.stage,
            round_total = report.round_total,
            game_pot = report.game_pot,
            "round completed"
        );
        tracing::debug!(claims = ?report.claims, messages = snapshot.state.messages().len());
        self.bus
            .publish(Event::RoundCompleted(Box::new(snapshot.clone())));
    }
}
