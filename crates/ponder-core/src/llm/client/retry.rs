//! Retry logic for LLM requests

use super::types::LlmClient;
use crate::error::{PonderError, PonderResult};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{instrument, warn};

/// Backoff before retry number `attempt` (0-based): 2^attempt seconds plus
/// up to 500ms of jitter per second of delay
pub(super) fn backoff_delay(attempt: u32) -> Duration {
    let base_delay_secs = 2_u64.pow(attempt.min(6));
    let jitter_ms = rand::thread_rng().gen_range(0..=(base_delay_secs * 500));
    Duration::from_secs(base_delay_secs) + Duration::from_millis(jitter_ms)
}

impl LlmClient {
    /// Execute a request with retry logic and exponential backoff.
    ///
    /// Only errors for which [`PonderError::is_retryable`] holds are retried;
    /// anything else is returned immediately.
    #[instrument(skip(self, operation), fields(model = %self.params.model))]
    pub(super) async fn execute_with_retry<T, F, Fut>(&self, operation: F) -> PonderResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PonderResult<T>>,
    {
        let max_retries = self.params.max_retries.unwrap_or(2);
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(attempt, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        warn!(error = %error, "non-retryable error");
                        return Err(error);
                    }

                    if attempt < max_retries {
                        let delay = backoff_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_secs = delay.as_secs_f64(),
                            error = %error,
                            "retrying after failure"
                        );
                        sleep(delay).await;
                    } else {
                        tracing::error!(attempts = max_retries + 1, "all retry attempts exhausted");
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            PonderError::llm_with_model(
                format!(
                    "All {} retry attempts failed without error details",
                    max_retries + 1
                ),
                self.params.model.clone(),
            )
        }))
    }
}
