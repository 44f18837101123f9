//! Server-Sent Events decoding for OpenAI-compatible streaming responses
//!
//! Network chunks do not line up with event boundaries, and a multi-byte
//! UTF-8 character (every CJK character, for instance) may be split across
//! two chunks. The decoder buffers both cases.

use crate::error::PonderError;
use crate::llm::streaming::{LlmStream, StreamChunk};
use futures::{Stream, StreamExt};
use serde_json::Value;

/// A parsed SSE event
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
}

impl SseEvent {
    /// Check if this is the `[DONE]` marker
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}

/// Buffered SSE decoder that handles partial chunks
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    incomplete_utf8: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut bytes = std::mem::take(&mut self.incomplete_utf8);
        bytes.extend_from_slice(chunk);

        let valid_up_to = match std::str::from_utf8(&bytes) {
            Ok(_) => bytes.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                tracing::warn!(
                    position = e.valid_up_to(),
                    "invalid UTF-8 in event stream, replacing"
                );
                self.buffer.push_str(&String::from_utf8_lossy(&bytes));
                return self.drain_events();
            }
        };

        self.incomplete_utf8 = bytes.split_off(valid_up_to);
        self.buffer.push_str(&String::from_utf8_lossy(&bytes));
        self.drain_events()
    }

    /// Flush a trailing event that was not terminated by a blank line
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        Self::parse_event(&rest)
    }

    fn drain_events(&mut self) -> Vec<SseEvent> {
        if self.buffer.contains('\r') {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let mut events = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let event_text: String = self.buffer.drain(..end + 2).collect();
            if let Some(event) = Self::parse_event(&event_text) {
                events.push(event);
            }
        }
        events
    }

    fn parse_event(text: &str) -> Option<SseEvent> {
        let mut event_type = None;
        let mut data_lines: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(value) = line.strip_prefix("data:") {
                data_lines.push(value.strip_prefix(' ').unwrap_or(value));
            } else if let Some(value) = line.strip_prefix("event:") {
                event_type = Some(value.trim().to_string());
            }
        }

        if data_lines.is_empty() {
            return None;
        }

        Some(SseEvent {
            event_type,
            data: data_lines.join("\n"),
        })
    }
}

/// Interpret one event of an OpenAI-compatible chat completion stream
fn chunk_from_event(event: &SseEvent) -> Option<Result<StreamChunk, PonderError>> {
    if event.is_done() {
        return Some(Ok(StreamChunk::final_chunk(None, Some("stop".to_string()))));
    }

    let json: Value = match serde_json::from_str(&event.data) {
        Ok(json) => json,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable stream event");
            return None;
        }
    };

    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Some(Err(PonderError::llm(format!(
            "Stream error from endpoint: {}",
            message
        ))));
    }

    let choice = json["choices"].as_array()?.first()?;
    if let Some(content) = choice["delta"]["content"].as_str() {
        if !content.is_empty() {
            return Some(Ok(StreamChunk::content(content)));
        }
    }
    if let Some(reason) = choice["finish_reason"].as_str() {
        return Some(Ok(StreamChunk::final_chunk(None, Some(reason.to_string()))));
    }
    None
}

/// Parse an OpenAI-compatible SSE byte stream into an [`LlmStream`]
pub fn openai_sse_stream<S, B, E>(byte_stream: S) -> LlmStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let stream = byte_stream
        .map(Some)
        .chain(futures::stream::once(async { None }))
        .scan(SseDecoder::new(), |decoder, item| {
            let events: Vec<Result<SseEvent, PonderError>> = match item {
                Some(Ok(chunk)) => decoder.feed(chunk.as_ref()).into_iter().map(Ok).collect(),
                Some(Err(e)) => vec![Err(PonderError::llm(format!("Stream error: {}", e)))],
                None => decoder.finish().into_iter().map(Ok).collect(),
            };
            let chunks: Vec<Result<StreamChunk, PonderError>> = events
                .into_iter()
                .filter_map(|event| match event {
                    Ok(event) => chunk_from_event(&event),
                    Err(e) => Some(Err(e)),
                })
                .collect();
            futures::future::ready(Some(futures::stream::iter(chunks)))
        })
        .flatten();

    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::streaming::stream_utils::collect_stream;

    fn delta(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    #[test]
    fn test_decoder_splits_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: one\n\ndata: two\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "one");
        assert_eq!(events[1].data, "two");
    }

    #[test]
    fn test_decoder_buffers_partial_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: par").is_empty());
        let events = decoder.feed(b"tial\n\n");
        assert_eq!(events[0].data, "partial");
    }

    #[test]
    fn test_decoder_handles_split_utf8() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: 你好\n\n".as_bytes();
        // split inside the first CJK character
        let (a, b) = bytes.split_at(7);
        assert!(decoder.feed(a).is_empty());
        let events = decoder.feed(b);
        assert_eq!(events[0].data, "你好");
    }

    #[test]
    fn test_decoder_handles_crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b": keepalive\r\n\r\nevent: delta\r\ndata: x\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type.as_deref(), Some("delta"));
        assert_eq!(events[0].data, "x");
    }

    #[tokio::test]
    async fn test_openai_sse_stream_collects_content() {
        let body = format!("{}{}data: [DONE]\n\n", delta("Hel"), delta("lo"));
        let bytes = body.into_bytes();
        let (a, b) = bytes.split_at(10);
        let chunks = vec![Ok::<_, std::io::Error>(a.to_vec()), Ok(b.to_vec())];

        let response = collect_stream(openai_sse_stream(futures::stream::iter(chunks)))
            .await
            .unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_openai_sse_stream_flushes_unterminated_event() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}";
        let chunks = vec![Ok::<_, std::io::Error>(body.as_bytes().to_vec())];

        let response = collect_stream(openai_sse_stream(futures::stream::iter(chunks)))
            .await
            .unwrap();
        assert_eq!(response.content, "tail");
    }

    #[tokio::test]
    async fn test_openai_sse_stream_surfaces_endpoint_error() {
        let body = "data: {\"error\":{\"message\":\"overloaded\"}}\n\n";
        let chunks = vec![Ok::<_, std::io::Error>(body.as_bytes().to_vec())];

        let result = collect_stream(openai_sse_stream(futures::stream::iter(chunks))).await;
        assert!(result.unwrap_err().to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_openai_sse_stream_transport_error() {
        let chunks = vec![
            Ok(delta("a").into_bytes()),
            Err(std::io::Error::other("reset")),
        ];

        let result = collect_stream(openai_sse_stream(futures::stream::iter(chunks))).await;
        assert!(result.is_err());
    }
}
