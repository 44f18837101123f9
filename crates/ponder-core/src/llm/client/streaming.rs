//! Streaming chat completion requests

use super::types::LlmClient;
use crate::error::PonderResult;
use crate::llm::messages::LlmMessage;
use crate::llm::sse::openai_sse_stream;
use crate::llm::streaming::LlmStream;
use tracing::instrument;

impl LlmClient {
    /// Send a streaming chat completion request.
    ///
    /// Retries cover establishing the stream only; an error in the middle of
    /// the stream is yielded as a stream item.
    #[instrument(skip(self, messages), fields(model = %self.params.model))]
    pub async fn chat_stream(&self, messages: &[LlmMessage]) -> PonderResult<LlmStream> {
        let body = self.build_request_body(messages, true, None);
        let response = self.execute_with_retry(|| self.post(&body)).await?;
        Ok(openai_sse_stream(response.bytes_stream()))
    }
}
