//! Chinese-to-English translation with a reviewer loop

use super::prompts;
use crate::agent::{ConversationState, Responder, RunContext, StateDecision, StateDelta, Workflow};
use crate::error::PonderResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Marker the reviewer uses to accept a translation
pub const PASS_MARKER: &str = "PASS";

/// Translate, let a reviewer critique, revise until it passes
pub struct TranslationWorkflow {
    responder: Arc<dyn Responder>,
}

impl TranslationWorkflow {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl Workflow for TranslationWorkflow {
    fn name(&self) -> &str {
        "translation"
    }

    async fn act(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        let messages = prompts::translate(state.query(), state.critique());
        let translation = self.responder.ask(&messages).await?;
        debug!(attempt = state.attempt_count() + 1, "translation drafted");
        Ok(StateDelta::new().answer(translation.trim()))
    }

    async fn evaluate(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        let translation = state.current_answer().unwrap_or_default();
        let critique = self
            .responder
            .ask(&prompts::review_translation(state.query(), translation))
            .await?;

        let decision = if critique.to_uppercase().contains(PASS_MARKER) {
            StateDecision::Sufficient
        } else {
            StateDecision::Continue
        };
        debug!(?decision, "translation reviewed");

        Ok(StateDelta::new().critique(critique).decision(decision))
    }
}
