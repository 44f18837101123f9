//! Plain chat completion requests

use super::request::parse_response;
use super::types::LlmClient;
use crate::error::{PonderError, PonderResult};
use crate::llm::messages::{LlmMessage, LlmResponse};
use crate::tools::ToolSchema;
use serde_json::Value;
use tracing::instrument;

impl LlmClient {
    /// Send a chat completion request and return the full response
    #[instrument(skip(self, messages), fields(model = %self.params.model, messages = messages.len()))]
    pub async fn chat(&self, messages: &[LlmMessage]) -> PonderResult<LlmResponse> {
        let body = self.build_request_body(messages, false, None);
        let response = self.execute_with_retry(|| self.send_once(&body)).await?;

        if let Some(usage) = &response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "llm request completed"
            );
        }
        Ok(response)
    }

    /// Chat completion that may answer with tool calls instead of text
    #[instrument(skip(self, messages, tools), fields(model = %self.params.model, tools = tools.len()))]
    pub async fn chat_with_tools(
        &self,
        messages: &[LlmMessage],
        tools: &[ToolSchema],
    ) -> PonderResult<LlmResponse> {
        let body = self.build_tool_request_body(messages, tools);
        let response = self.execute_with_retry(|| self.send_once(&body)).await?;
        tracing::debug!(tool_calls = response.tool_calls.len(), "tool turn completed");
        Ok(response)
    }

    /// One request attempt without retries
    pub(super) async fn send_once(&self, body: &Value) -> PonderResult<LlmResponse> {
        let response = self.post(body).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| PonderError::llm(format!("Failed to parse response body: {}", e)))?;
        parse_response(json)
    }
}
