//! LLM integration for Ponder
//!
//! A single client type talks to any OpenAI-compatible chat completion
//! endpoint. Plain, streaming and schema-constrained calls are supported.

pub mod client;
pub mod messages;
pub mod schema;
pub mod sse;
pub mod streaming;

pub use client::LlmClient;
pub use messages::{LlmMessage, LlmResponse, LlmUsage, MessageRole};
pub use schema::{OutputSchema, from_structured, parse_structured, strip_code_fences};
pub use streaming::{LlmStream, StreamChunk, stream_utils};
