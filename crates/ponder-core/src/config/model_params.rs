//! Model parameters for OpenAI-compatible chat endpoints

use crate::error::{PonderError, PonderResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for one chat model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Model name/ID
    pub model: String,
    /// Base URL of the OpenAI-compatible API (up to and including `/v1`)
    pub base_url: Option<String>,
    /// API key; self-hosted gateways usually accept any value
    pub api_key: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Maximum transport retries for a single request
    pub max_retries: Option<u32>,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: None,
            api_key: None,
            max_tokens: Some(4096),
            temperature: Some(0.7),
            max_retries: Some(2),
            connect_timeout_secs: 30,
            request_timeout_secs: 120,
        }
    }
}

impl ModelParameters {
    /// Parameters tuned for the cheap fast-path model
    pub fn fast_default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(512),
            temperature: Some(0.0),
            ..Self::default()
        }
    }

    /// Get API key from config or the `OPENAI_API_KEY` environment variable
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    /// Get the base URL, trimmed of any trailing slash
    pub fn get_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
            .trim_end_matches('/')
            .to_string()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the parameters
    pub fn validate(&self) -> PonderResult<()> {
        if self.model.trim().is_empty() {
            return Err(PonderError::config("Model name cannot be empty"));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PonderError::config(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }

        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(PonderError::config("max_tokens must be greater than 0"));
            }
        }

        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(PonderError::config(format!(
                    "Invalid base_url '{}': must start with http:// or https://",
                    base_url
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(PonderError::config("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// Copy with the API key replaced by a short masked form
    pub fn masked(&self) -> Self {
        let mut params = self.clone();
        params.api_key = params.api_key.as_deref().map(mask_key);
        params
    }
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}
