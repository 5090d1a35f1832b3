//! Background work driven by the runtime: provider calls and their metrics.

mod decisions;
mod metrics;

pub(crate) use decisions::{DecisionJob, collect_decisions};
pub use metrics::{DecisionMetrics, MetricsSnapshot};
