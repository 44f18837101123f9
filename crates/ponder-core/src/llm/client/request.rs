//! Request bodies and response parsing for chat completions

use super::types::LlmClient;
use crate::error::{PonderError, PonderResult};
use crate::llm::messages::{LlmMessage, LlmResponse, LlmUsage, MessageRole};
use crate::llm::schema::OutputSchema;
use crate::tools::{ToolCall, ToolSchema};
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::warn;

impl LlmClient {
    /// Build the JSON body for a chat completion request
    pub(super) fn build_request_body(
        &self,
        messages: &[LlmMessage],
        stream: bool,
        schema: Option<&OutputSchema>,
    ) -> Value {
        let mut body = json!({
            "model": self.params.model,
            "messages": messages.iter().map(wire_message).collect::<Vec<_>>(),
        });

        if let Some(max_tokens) = self.params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        if stream {
            body["stream"] = json!(true);
        }
        if let Some(schema) = schema {
            body["response_format"] = schema.response_format();
        }

        body
    }

    /// Chat completion body offering `tools` to the model
    pub(super) fn build_tool_request_body(
        &self,
        messages: &[LlmMessage],
        tools: &[ToolSchema],
    ) -> Value {
        let mut body = self.build_request_body(messages, false, None);
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.iter().map(ToolSchema::to_openai).collect());
        }
        body
    }

    /// Send a request body and return the successful HTTP response
    pub(super) async fn post(&self, body: &Value) -> PonderResult<reqwest::Response> {
        let mut request = self.http_client.post(self.completions_url()).json(body);
        if let Some(api_key) = self.params.get_api_key() {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PonderError::llm_with_status(
                format!("API error (status {}): {}", status.as_u16(), error_text),
                self.params.model.clone(),
                status.as_u16(),
            ));
        }

        Ok(response)
    }

    fn send_error(&self, error: reqwest::Error) -> PonderError {
        let kind = if error.is_timeout() {
            "timeout"
        } else if error.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        PonderError::llm_with_model(format!("{}: {}", kind, error), self.params.model.clone())
    }
}

/// A message in the chat completion wire format
pub(super) fn wire_message(message: &LlmMessage) -> Value {
    let mut value = json!({
        "role": message.role.to_string(),
        "content": message.content,
    });

    if message.role == MessageRole::Assistant && !message.tool_calls.is_empty() {
        value["tool_calls"] = Value::Array(
            message
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.arguments_json(),
                        }
                    })
                })
                .collect(),
        );
    }
    if let Some(call_id) = &message.tool_call_id {
        value["tool_call_id"] = json!(call_id);
    }

    value
}

/// Tool calls of a response message; undecodable arguments become empty
fn parse_tool_calls(message: &Value) -> Vec<ToolCall> {
    let Some(calls) = message["tool_calls"].as_array() else {
        return Vec::new();
    };

    calls
        .iter()
        .filter_map(|call| {
            let function = call.get("function")?;
            let name = function["name"].as_str()?;
            let arguments = match &function["arguments"] {
                Value::String(raw) => serde_json::from_str::<HashMap<String, Value>>(raw)
                    .unwrap_or_else(|e| {
                        warn!(tool = name, error = %e, "tool arguments are not a JSON object");
                        HashMap::new()
                    }),
                Value::Object(map) => map.clone().into_iter().collect(),
                _ => HashMap::new(),
            };
            Some(ToolCall::new(
                call["id"].as_str().unwrap_or_default(),
                name,
                arguments,
            ))
        })
        .collect()
}

/// Parse a non-streaming chat completion response
pub(super) fn parse_response(json: Value) -> PonderResult<LlmResponse> {
    let choice = json["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| PonderError::llm("response carries no choices"))?;

    let content = choice["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let usage = json.get("usage").and_then(|u| {
        Some(LlmUsage {
            prompt_tokens: u["prompt_tokens"].as_u64()? as u32,
            completion_tokens: u["completion_tokens"].as_u64()? as u32,
            total_tokens: u["total_tokens"].as_u64()? as u32,
        })
    });

    Ok(LlmResponse {
        content,
        usage,
        model: json["model"].as_str().map(str::to_string),
        finish_reason: choice["finish_reason"].as_str().map(str::to_string),
        tool_calls: parse_tool_calls(&choice["message"]),
    })
}
