//! LLM client type definitions

use crate::config::ModelParameters;
use reqwest::Client;

/// LLM client for one model on an OpenAI-compatible endpoint.
///
/// # Examples
///
/// ```no_run
/// use ponder_core::config::ModelParameters;
/// use ponder_core::llm::{LlmClient, LlmMessage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LlmClient::new(ModelParameters::fast_default())?;
/// let response = client.chat(&[LlmMessage::user("Hello, world!")]).await?;
/// println!("Response: {}", response.content);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LlmClient {
    pub(super) params: ModelParameters,
    pub(super) http_client: Client,
}

impl LlmClient {
    /// Model name this client talks to
    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// Model parameters
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub(super) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.params.get_base_url())
    }
}
