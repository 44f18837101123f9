//! The external responder seam
//!
//! Workflows talk to language models only through [`Responder`], so tests
//! can substitute a scripted fake and the controller never sees HTTP.

use crate::error::PonderResult;
use crate::llm::streaming::stream_utils;
use crate::llm::{LlmClient, LlmMessage, LlmResponse, LlmStream, OutputSchema};
use crate::tools::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;

/// A language model that answers chat messages
#[async_trait]
pub trait Responder: Send + Sync {
    /// Complete answer for the messages
    async fn ask(&self, messages: &[LlmMessage]) -> PonderResult<String>;

    /// Answer as a finite stream of fragments whose concatenation equals the
    /// full answer
    async fn ask_stream(&self, messages: &[LlmMessage]) -> PonderResult<LlmStream> {
        let text = self.ask(messages).await?;
        Ok(stream_utils::from_text(text))
    }

    /// JSON object conforming to `schema`; unparseable output is reported as
    /// `PonderError::MalformedOutput`
    async fn ask_structured(
        &self,
        messages: &[LlmMessage],
        schema: &OutputSchema,
    ) -> PonderResult<Value>;

    /// One turn with `tools` on offer; the response either carries tool
    /// calls or a final text answer. Responders without tool support answer
    /// in text.
    async fn ask_with_tools(
        &self,
        messages: &[LlmMessage],
        tools: &[ToolSchema],
    ) -> PonderResult<LlmResponse> {
        let _ = tools;
        Ok(LlmResponse::text(self.ask(messages).await?))
    }

    /// Name used in logs
    fn describe(&self) -> String {
        "responder".to_string()
    }
}

#[async_trait]
impl Responder for LlmClient {
    async fn ask(&self, messages: &[LlmMessage]) -> PonderResult<String> {
        Ok(self.chat(messages).await?.content)
    }

    async fn ask_stream(&self, messages: &[LlmMessage]) -> PonderResult<LlmStream> {
        self.chat_stream(messages).await
    }

    async fn ask_structured(
        &self,
        messages: &[LlmMessage],
        schema: &OutputSchema,
    ) -> PonderResult<Value> {
        self.chat_structured(messages, schema).await
    }

    async fn ask_with_tools(
        &self,
        messages: &[LlmMessage],
        tools: &[ToolSchema],
    ) -> PonderResult<LlmResponse> {
        self.chat_with_tools(messages, tools).await
    }

    fn describe(&self) -> String {
        self.model().to_string()
    }
}
