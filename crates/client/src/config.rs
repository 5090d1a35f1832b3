//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use pot_runtime::EventBus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// RON scenario to play; the built-in scenario when unset.
    pub scenario: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub concurrent_decisions: bool,
    pub event_buffer: usize,
    /// Where to write the JSON summary, if anywhere.
    pub report_json: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scenario: None,
            session_id: None,
            log_dir: None,
            concurrent_decisions: true,
            event_buffer: EventBus::DEFAULT_CAPACITY,
            report_json: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `POT_SCENARIO` - Path to a RON scenario file (default: built-in scenario)
    /// - `POT_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `POT_LOG_DIR` - Log directory (default: platform cache directory)
    /// - `POT_CONCURRENT_DECISIONS` - Call providers concurrently (default: true)
    /// - `POT_EVENT_BUFFER` - Events buffered per topic (default: 100)
    /// - `POT_REPORT_JSON` - Write the summary as JSON to this path
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.scenario = lookup("POT_SCENARIO").map(PathBuf::from);
        config.session_id = lookup("POT_SESSION_ID");
        config.log_dir = lookup("POT_LOG_DIR").map(PathBuf::from);
        config.report_json = lookup("POT_REPORT_JSON").map(PathBuf::from);

        if let Some(concurrent) = parse(&lookup, "POT_CONCURRENT_DECISIONS") {
            config.concurrent_decisions = concurrent;
        }
        if let Some(capacity) = parse::<usize>(&lookup, "POT_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
