//! Workflow trait and per-run context

use super::state::{ConversationState, StateDelta};
use crate::cache::KeyPolicy;
use crate::error::{PonderError, PonderResult};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Receives answer fragments for display as they are produced
pub type FragmentSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Context handed to every workflow step of one run
#[derive(Clone)]
pub struct RunContext {
    run_id: Uuid,
    sink: Option<FragmentSink>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            sink: None,
        }
    }

    /// Stream answer fragments to `sink`
    pub fn with_sink(mut self, sink: FragmentSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// True when someone is listening for fragments
    pub fn is_streaming(&self) -> bool {
        self.sink.is_some()
    }

    /// Forward a fragment to the sink, if any
    pub fn emit(&self, fragment: &str) {
        if let Some(sink) = &self.sink {
            sink(fragment);
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("streaming", &self.is_streaming())
            .finish()
    }
}

/// The domain-specific steps driven by the controller
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Short name used in logs and on the command line
    fn name(&self) -> &str;

    /// How queries become cache keys
    fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::Exact
    }

    /// Whether greeting-like queries may use the fast lane
    fn allows_fast_path(&self) -> bool {
        false
    }

    /// Produce a candidate answer or new evidence
    async fn act(&self, state: &ConversationState, ctx: &RunContext) -> PonderResult<StateDelta>;

    /// Judge the current state
    async fn evaluate(
        &self,
        state: &ConversationState,
        ctx: &RunContext,
    ) -> PonderResult<StateDelta>;

    /// Render the final answer
    async fn finalize(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<String> {
        state
            .current_answer()
            .map(str::to_string)
            .ok_or_else(|| PonderError::other("run finished without an answer"))
    }
}
