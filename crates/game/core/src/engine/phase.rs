//! Round phases and the transition table that links them.
//!
//! ```text
//! Start ──Begin──▶ Supervisor ──Announced──▶ Players ──AllDecided──▶ Aggregator
//!                      ▲                                                 │
//!                      └──────────────────Continue───────────────────────┤
//!                                                                        └──Stop──▶ Terminal
//! ```

use super::errors::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Compiled, no round started yet.
    Start,
    /// Waiting for the supervisor to announce the stage.
    Supervisor,
    /// Collecting one decision per registered player.
    Players,
    /// All decisions in; waiting for aggregation and the continuation check.
    Aggregator,
    /// Game over. No further transitions.
    Terminal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Signal {
    Begin,
    Announced,
    AllDecided,
    Continue,
    Stop,
}

const TRANSITIONS: &[(Phase, Signal, Phase)] = &[
    (Phase::Start, Signal::Begin, Phase::Supervisor),
    (Phase::Supervisor, Signal::Announced, Phase::Players),
    (Phase::Players, Signal::AllDecided, Phase::Aggregator),
    (Phase::Aggregator, Signal::Continue, Phase::Supervisor),
    (Phase::Aggregator, Signal::Stop, Phase::Terminal),
];

impl Phase {
    /// Looks up the successor of `self` on `signal`.
    pub fn next(self, signal: Signal) -> Result<Phase, EngineError> {
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self && *on == signal)
            .map(|&(_, _, to)| to)
            .ok_or(EngineError::InvalidTransition {
                phase: self,
                signal,
            })
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_round_cycle() {
        let mut phase = Phase::Start;
        for signal in [Signal::Begin, Signal::Announced, Signal::AllDecided] {
            phase = phase.next(signal).unwrap();
        }
        assert_eq!(phase, Phase::Aggregator);
        assert_eq!(phase.next(Signal::Continue).unwrap(), Phase::Supervisor);
        assert_eq!(phase.next(Signal::Stop).unwrap(), Phase::Terminal);
    }

    #[test]
    fn terminal_has_no_exits() {
        for signal in [
            Signal::Begin,
            Signal::Announced,
            Signal::AllDecided,
            Signal::Continue,
            Signal::Stop,
        ] {
            assert!(Phase::Terminal.next(signal).is_err());
        }
    }

    #[test]
    fn players_cannot_skip_to_supervisor() {
        assert_eq!(
            Phase::Players.next(Signal::Continue).unwrap_err(),
            EngineError::InvalidTransition {
                phase: Phase::Players,
                signal: Signal::Continue,
            }
        );
    }
}
