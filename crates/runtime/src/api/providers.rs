//! Asynchronous abstraction for sourcing player decisions.
//!
//! Runtime users plug in [`DecisionProvider`] implementations so the game can
//! run against a language model, scripted fixtures, or simple policies. The
//! returned text is untrusted: the engine records it and parses it itself.
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pot_core::{PlayerId, PromptContext};

use super::errors::Result;

/// Everything a provider is shown for one decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionRequest {
    pub player: PlayerId,
    pub name: String,
    /// Fully rendered prompt.
    pub prompt: String,
    /// Slot values the prompt was rendered from.
    pub context: PromptContext,
}

/// Trait for answering a rendered decision prompt.
///
/// Different implementations can handle:
/// - Language model calls
/// - Scripted/replayed decisions
/// - Testing fixtures
///
/// Returning `Err` does not abort the game: the decision is recorded as a zero
/// claim and a warning is reported.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn decide(&self, request: &DecisionRequest) -> Result<String>;
}

/// Always answers with the same text.
#[derive(Clone, Debug)]
pub struct FixedDecisionProvider {
    answer: String,
}

impl FixedDecisionProvider {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl DecisionProvider for FixedDecisionProvider {
    async fn decide(&self, _request: &DecisionRequest) -> Result<String> {
        Ok(self.answer.clone())
    }
}

/// Replays a fixed list of answers, one per call, repeating the last one.
#[derive(Debug)]
pub struct ScriptedDecisionProvider {
    answers: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedDecisionProvider {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisionProvider {
    async fn decide(&self, _request: &DecisionRequest) -> Result<String> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .answers
            .get(index)
            .or_else(|| self.answers.last())
            .cloned()
            .unwrap_or_default())
    }
}

/// Adapts a synchronous closure into a provider.
pub struct FnDecisionProvider<F> {
    f: F,
}

impl<F> FnDecisionProvider<F>
where
    F: Fn(&DecisionRequest) -> Result<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> DecisionProvider for FnDecisionProvider<F>
where
    F: Fn(&DecisionRequest) -> Result<String> + Send + Sync,
{
    async fn decide(&self, request: &DecisionRequest) -> Result<String> {
        (self.f)(request)
    }
}
