//! Scripted responder used by unit tests

use super::responder::Responder;
use crate::error::{PonderError, PonderResult};
use crate::llm::{LlmMessage, LlmResponse, OutputSchema};
use crate::tools::{ToolCall, ToolSchema};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

/// Replies in order from a script and records every prompt it receives
#[derive(Default)]
pub(crate) struct ScriptedResponder {
    replies: Mutex<VecDeque<PonderResult<String>>>,
    structured: Mutex<VecDeque<PonderResult<Value>>>,
    turns: Mutex<VecDeque<PonderResult<LlmResponse>>>,
    offered_tools: Mutex<Vec<Vec<String>>>,
    prompts: Mutex<Vec<Vec<LlmMessage>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedResponder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub(crate) fn fail(self, error: PonderError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub(crate) fn structured(self, value: Value) -> Self {
        self.structured.lock().push_back(Ok(value));
        self
    }

    pub(crate) fn structured_error(self, error: PonderError) -> Self {
        self.structured.lock().push_back(Err(error));
        self
    }

    /// Tool turn that requests one call per `(id, name, arguments)`
    pub(crate) fn tool_calls(self, calls: &[(&str, &str, Value)]) -> Self {
        let tool_calls = calls
            .iter()
            .map(|(id, name, arguments)| {
                let arguments: HashMap<String, Value> = arguments
                    .as_object()
                    .map(|map| map.clone().into_iter().collect())
                    .unwrap_or_default();
                ToolCall::new(*id, *name, arguments)
            })
            .collect();
        let response = LlmResponse {
            tool_calls,
            ..LlmResponse::default()
        };
        self.turns.lock().push_back(Ok(response));
        self
    }

    /// Tool turn that answers in text
    pub(crate) fn tool_answer(self, text: &str) -> Self {
        self.turns.lock().push_back(Ok(LlmResponse::text(text)));
        self
    }

    pub(crate) fn tool_turn_error(self, error: PonderError) -> Self {
        self.turns.lock().push_back(Err(error));
        self
    }

    /// Tool names offered on each tool turn
    pub(crate) fn offered_tools(&self) -> Vec<Vec<String>> {
        self.offered_tools.lock().clone()
    }

    /// Messages of the n-th call
    pub(crate) fn messages(&self, index: usize) -> Vec<LlmMessage> {
        self.prompts.lock().get(index).cloned().unwrap_or_default()
    }

    /// Block every call until the gate is notified
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Total calls received so far
    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Concatenated text of the n-th prompt
    pub(crate) fn prompt(&self, index: usize) -> String {
        self.prompts
            .lock()
            .get(index)
            .map(|messages| {
                messages
                    .iter()
                    .map(|m| m.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    async fn ask(&self, messages: &[LlmMessage]) -> PonderResult<String> {
        self.prompts.lock().push(messages.to_vec());
        self.wait_for_gate().await;
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(PonderError::llm("script exhausted")))
    }

    async fn ask_structured(
        &self,
        messages: &[LlmMessage],
        _schema: &OutputSchema,
    ) -> PonderResult<Value> {
        self.prompts.lock().push(messages.to_vec());
        self.wait_for_gate().await;
        self.structured
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(PonderError::llm("script exhausted")))
    }

    async fn ask_with_tools(
        &self,
        messages: &[LlmMessage],
        tools: &[ToolSchema],
    ) -> PonderResult<LlmResponse> {
        self.prompts.lock().push(messages.to_vec());
        self.offered_tools
            .lock()
            .push(tools.iter().map(|t| t.name.clone()).collect());
        self.wait_for_gate().await;
        self.turns
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(PonderError::llm("script exhausted")))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
