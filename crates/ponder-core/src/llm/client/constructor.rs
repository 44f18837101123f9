//! LLM client constructor

use super::types::LlmClient;
use crate::config::ModelParameters;
use crate::error::{PonderError, PonderResult};
use reqwest::Client;
use tracing::debug;

impl LlmClient {
    /// Create a new LLM client.
    ///
    /// # Errors
    ///
    /// Returns an error if the model parameters are invalid or the HTTP
    /// client cannot be built.
    pub fn new(params: ModelParameters) -> PonderResult<Self> {
        params.validate().map_err(|e| {
            PonderError::config_with_context(
                format!("Invalid model parameters: {}", e),
                format!("Creating client for model '{}'", params.model),
            )
        })?;

        let http_client = Client::builder()
            .connect_timeout(params.connect_timeout())
            .timeout(params.request_timeout())
            .build()
            .map_err(|e| PonderError::llm(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            model = %params.model,
            base_url = %params.get_base_url(),
            "created LLM client"
        );

        Ok(Self {
            params,
            http_client,
        })
    }
}
