//! Streaming response support for LLM clients

use crate::error::PonderResult;
use crate::llm::messages::{LlmResponse, LlmUsage};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A chunk of streaming response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental content
    pub content: Option<String>,
    /// Usage information (usually only in the last chunk)
    pub usage: Option<LlmUsage>,
    /// Whether this is the final chunk
    pub is_final: bool,
    /// Finish reason (if final)
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    /// Create a new content chunk
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            usage: None,
            is_final: false,
            finish_reason: None,
        }
    }

    /// Create a final chunk with usage information
    pub fn final_chunk(usage: Option<LlmUsage>, finish_reason: Option<String>) -> Self {
        Self {
            content: None,
            usage,
            is_final: true,
            finish_reason,
        }
    }
}

/// Stream of LLM response chunks
pub type LlmStream = Pin<Box<dyn Stream<Item = PonderResult<StreamChunk>> + Send>>;

/// Utility functions for working with streams
pub mod stream_utils {
    use super::*;
    use futures::StreamExt;

    /// Collect a stream into a complete response
    pub async fn collect_stream(mut stream: LlmStream) -> PonderResult<LlmResponse> {
        let mut content = String::new();
        let mut usage = None;
        let mut finish_reason = None;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;

            if let Some(chunk_content) = chunk.content {
                content.push_str(&chunk_content);
            }

            if chunk.is_final {
                usage = chunk.usage;
                finish_reason = chunk.finish_reason;
            }
        }

        Ok(LlmResponse {
            content,
            usage,
            model: None,
            finish_reason,
            tool_calls: Vec::new(),
        })
    }

    /// Collect a stream, handing each non-empty fragment to `on_fragment` as it arrives
    pub async fn collect_with<F>(mut stream: LlmStream, mut on_fragment: F) -> PonderResult<String>
    where
        F: FnMut(&str),
    {
        let mut content = String::new();
        while let Some(chunk_result) = stream.next().await {
            if let Some(fragment) = chunk_result?.content {
                if !fragment.is_empty() {
                    on_fragment(&fragment);
                    content.push_str(&fragment);
                }
            }
        }
        Ok(content)
    }

    /// A stream that yields a complete text as one fragment followed by a final chunk
    pub fn from_text(text: impl Into<String>) -> LlmStream {
        let chunks = vec![
            Ok(StreamChunk::content(text)),
            Ok(StreamChunk::final_chunk(None, Some("stop".to_string()))),
        ];
        Box::pin(futures::stream::iter(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::stream_utils::*;
    use super::*;
    use crate::error::PonderError;

    #[tokio::test]
    async fn test_collect_stream_concatenates_fragments() {
        let chunks = vec![
            Ok(StreamChunk::content("Hel")),
            Ok(StreamChunk::content("lo")),
            Ok(StreamChunk::final_chunk(None, Some("stop".to_string()))),
        ];
        let stream: LlmStream = Box::pin(futures::stream::iter(chunks));

        let response = collect_stream(stream).await.unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_collect_with_reports_each_fragment() {
        let mut seen = Vec::new();
        let text = collect_with(from_text("whole"), |f| seen.push(f.to_string()))
            .await
            .unwrap();
        assert_eq!(text, "whole");
        assert_eq!(seen, vec!["whole".to_string()]);
    }

    #[tokio::test]
    async fn test_collect_propagates_stream_error() {
        let chunks = vec![
            Ok(StreamChunk::content("partial")),
            Err(PonderError::llm("connection reset")),
        ];
        let stream: LlmStream = Box::pin(futures::stream::iter(chunks));

        assert!(collect_stream(stream).await.is_err());
    }
}
