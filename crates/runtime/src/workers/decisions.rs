//! Provider invocation for one round of decisions.
//!
//! Every job carries a prompt rendered from the same post-supervisor snapshot,
//! so calls are independent and may run concurrently. Outcomes are returned in
//! job order; the caller applies them to the engine as the single writer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pot_core::PlayerId;
use tokio::task::{JoinError, JoinSet};

use super::DecisionMetrics;
use crate::api::{DecisionProvider, DecisionRequest, Result, RuntimeError};

pub(crate) struct DecisionJob {
    pub request: DecisionRequest,
    pub provider: Arc<dyn DecisionProvider>,
}

pub(crate) struct DecisionOutcome {
    pub player: PlayerId,
    /// Raw provider answer, or the provider's own error.
    pub answer: Result<String>,
}

/// Runs every job and returns one outcome per job, in job order.
///
/// Each provider call runs in its own task, in both modes. A call that panics
/// is reported as a provider error for its player.
pub(crate) async fn collect_decisions(
    jobs: Vec<DecisionJob>,
    concurrent: bool,
    metrics: &Arc<DecisionMetrics>,
) -> Vec<DecisionOutcome> {
    if !concurrent {
        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            let player = job.request.player;
            let task_metrics = Arc::clone(metrics);
            let joined = tokio::spawn(async move { invoke(job, &task_metrics).await }).await;
            outcomes.push(joined.unwrap_or_else(|err| task_failed(player, err, metrics)));
        }
        return outcomes;
    }

    let mut slots: Vec<Option<DecisionOutcome>> = jobs.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();
    let mut owners = HashMap::with_capacity(jobs.len());
    for (index, job) in jobs.into_iter().enumerate() {
        let player = job.request.player;
        let task_metrics = Arc::clone(metrics);
        let handle = tasks.spawn(async move { invoke(job, &task_metrics).await });
        owners.insert(handle.id(), (index, player));
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                if let Some(&(index, _)) = owners.get(&id) {
                    slots[index] = Some(outcome);
                }
            }
            Err(err) => {
                if let Some(&(index, player)) = owners.get(&err.id()) {
                    slots[index] = Some(task_failed(player, err, metrics));
                }
            }
        }
    }

    slots.into_iter().flatten().collect()
}

fn task_failed(player: PlayerId, err: JoinError, metrics: &DecisionMetrics) -> DecisionOutcome {
    tracing::warn!(%player, error = %err, "decision task failed");
    metrics.record_invocation(Duration::ZERO, true);
    DecisionOutcome {
        player,
        answer: Err(RuntimeError::Provider(format!("decision task failed: {err}"))),
    }
}

async fn invoke(job: DecisionJob, metrics: &DecisionMetrics) -> DecisionOutcome {
    let DecisionJob { request, provider } = job;

    tracing::debug!(player = %request.player, "requesting decision");
    let started = Instant::now();
    let answer = provider.decide(&request).await;
    metrics.record_invocation(started.elapsed(), answer.is_err());

    DecisionOutcome {
        player: request.player,
        answer,
    }
}
