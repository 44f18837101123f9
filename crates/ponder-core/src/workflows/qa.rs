//! Question answering with a fast lane for greetings

use super::{ask_for_display, prompts};
use crate::agent::{
    ConversationState, Lane, Responder, RunContext, StateDecision, StateDelta, Workflow,
};
use crate::cache::KeyPolicy;
use crate::error::PonderResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Answers written to a fresh QA cache file
pub fn seed_entries() -> Vec<(String, String)> {
    let policy = KeyPolicy::Compact;
    vec![
        (
            policy.normalize("LangGraph是什麼"),
            "LangGraph 是一個用於構建有狀態、多參與者應用程式...".to_string(),
        ),
        (
            policy.normalize("你的名字"),
            "我是這個課程的 AI 助教。".to_string(),
        ),
    ]
}

/// Single-shot answers: greetings go to the fast model, everything else to
/// the expert model (streamed when a sink is attached)
pub struct QaWorkflow {
    expert: Arc<dyn Responder>,
    fast: Arc<dyn Responder>,
    stream_expert: bool,
}

impl QaWorkflow {
    pub fn new(expert: Arc<dyn Responder>, fast: Arc<dyn Responder>) -> Self {
        Self {
            expert,
            fast,
            stream_expert: true,
        }
    }

    pub fn with_streaming(mut self, stream_expert: bool) -> Self {
        self.stream_expert = stream_expert;
        self
    }
}

#[async_trait]
impl Workflow for QaWorkflow {
    fn name(&self) -> &str {
        "qa"
    }

    fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::Compact
    }

    fn allows_fast_path(&self) -> bool {
        true
    }

    async fn act(&self, state: &ConversationState, ctx: &RunContext) -> PonderResult<StateDelta> {
        let answer = match state.lane() {
            Lane::Fast => {
                debug!(responder = %self.fast.describe(), "fast lane");
                self.fast.ask(&prompts::fast_reply(state.query())).await?
            }
            Lane::Expert => {
                debug!(responder = %self.expert.describe(), "expert lane");
                let messages = prompts::expert_answer(state.query());
                ask_for_display(self.expert.as_ref(), &messages, ctx, self.stream_expert).await?
            }
        };
        Ok(StateDelta::new().answer(answer))
    }

    async fn evaluate(
        &self,
        _state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        Ok(StateDelta::new().decision(StateDecision::Sufficient))
    }
}
