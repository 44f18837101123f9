//! Schema-constrained chat completion requests

use super::types::LlmClient;
use crate::error::PonderResult;
use crate::llm::messages::LlmMessage;
use crate::llm::schema::{OutputSchema, parse_structured};
use serde_json::Value;
use tracing::instrument;

impl LlmClient {
    /// Request a JSON object conforming to `schema`.
    ///
    /// Transport failures are retried as usual. Output that fails to parse
    /// is returned as `MalformedOutput` without retrying.
    #[instrument(skip(self, messages, schema), fields(model = %self.params.model, schema = %schema.name))]
    pub async fn chat_structured(
        &self,
        messages: &[LlmMessage],
        schema: &OutputSchema,
    ) -> PonderResult<Value> {
        let body = self.build_request_body(messages, false, Some(schema));
        let response = self.execute_with_retry(|| self.send_once(&body)).await?;
        parse_structured(&response.content, schema)
    }
}
