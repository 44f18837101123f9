//! Tool-calling agent
//!
//! Each Act is one model turn with the registry's tools on offer. A turn that
//! requests tool calls runs them and appends the calls and their results to
//! the transcript; a turn without tool calls is the answer. The attempt cap
//! bounds the number of model turns.

use super::prompts;
use crate::agent::{
    ConversationState, Responder, RunContext, StateDecision, StateDelta, Workflow,
};
use crate::error::PonderResult;
use crate::llm::{LlmMessage, MessageRole};
use crate::tools::{ToolRegistry, WeatherTool};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry with the built-in tools
pub fn default_registry() -> ToolRegistry {
    ToolRegistry::new().with_tool(Arc::new(WeatherTool))
}

pub struct ToolAgentWorkflow {
    responder: Arc<dyn Responder>,
    registry: Arc<ToolRegistry>,
}

impl ToolAgentWorkflow {
    pub fn new(responder: Arc<dyn Responder>, registry: ToolRegistry) -> Self {
        Self {
            responder,
            registry: Arc::new(registry),
        }
    }
}

/// Tool outputs in the transcript, one per line
fn observations(state: &ConversationState) -> String {
    let lines: Vec<&str> = state
        .transcript()
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .map(|m| m.content.as_str())
        .collect();
    if lines.is_empty() {
        "無".to_string()
    } else {
        lines.join("\n")
    }
}

#[async_trait]
impl Workflow for ToolAgentWorkflow {
    fn name(&self) -> &str {
        "tools"
    }

    async fn act(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<StateDelta> {
        let mut delta = StateDelta::new();
        let history = if state.transcript().is_empty() {
            let opening = prompts::tool_agent(state.query());
            delta = delta.messages(opening.clone());
            opening
        } else {
            state.transcript().to_vec()
        };

        let response = self
            .responder
            .ask_with_tools(&history, &self.registry.schemas())
            .await?;

        if response.tool_calls.is_empty() {
            return Ok(delta
                .message(LlmMessage::assistant(response.content.as_str()))
                .answer(response.content));
        }

        let calls = response.tool_calls.clone();
        delta = delta.message(LlmMessage::assistant_with_tool_calls(
            response.content,
            response.tool_calls,
        ));

        for call in &calls {
            let output = match self.registry.execute(call).await {
                Ok(output) => {
                    info!(tool = %call.name, output = %output, "tool call completed");
                    output
                }
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool call failed");
                    format!("工具執行失敗: {}", e)
                }
            };
            delta = delta.message(LlmMessage::tool_result(call.id.as_str(), output));
        }
        Ok(delta)
    }

    async fn evaluate(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> PonderResult<StateDelta> {
        let decision = if state.current_answer().is_some() {
            StateDecision::Sufficient
        } else {
            StateDecision::Continue
        };
        Ok(StateDelta::new().decision(decision))
    }

    /// The model's own answer, or one summary call over the tool results when
    /// the cap cut the loop short
    async fn finalize(&self, state: &ConversationState, _ctx: &RunContext) -> PonderResult<String> {
        if let Some(answer) = state.current_answer() {
            return Ok(answer.to_string());
        }
        info!(attempts = state.attempt_count(), "no answer within the cap, summarizing tool results");
        let messages = prompts::tool_summary(state.query(), &observations(state));
        self.responder.ask(&messages).await
    }
}
