//! LLM client for OpenAI-compatible chat completion endpoints
//!
//! This module provides the [`LlmClient`] used for both the expert and the
//! fast model. It supports plain, streaming and schema-constrained requests,
//! with retry and exponential backoff on transient failures.

mod chat;
mod constructor;
mod request;
mod retry;
mod streaming;
mod structured;
mod types;


pub use types::LlmClient;
