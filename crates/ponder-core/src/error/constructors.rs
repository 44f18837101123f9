//! Constructor methods for PonderError

use super::types::PonderError;

impl PonderError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            model: None,
            status_code: None,
            context: None,
        }
    }

    /// Create an LLM error tagged with the model that produced it
    pub fn llm_with_model(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            model: Some(model.into()),
            status_code: None,
            context: None,
        }
    }

    /// Create an LLM error for an API call that answered with a non-success status
    pub fn llm_with_status(
        message: impl Into<String>,
        model: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::Llm {
            message: message.into(),
            model: Some(model.into()),
            status_code: Some(status_code),
            context: None,
        }
    }

    /// Create an HTTP error with status code
    pub fn http_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: Some(status_code),
            context: None,
        }
    }

    /// Create a new cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create a cache error for a specific backing file
    pub fn cache_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create an IO error with message
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create a JSON error with message
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a malformed structured output error, keeping the raw text
    pub fn malformed_output(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
            raw: Some(raw.into()),
            context: None,
        }
    }

    /// Create a new search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
            context: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to any error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Config { context: c, .. }
            | Self::Llm { context: c, .. }
            | Self::Http { context: c, .. }
            | Self::Cache { context: c, .. }
            | Self::Io { context: c, .. }
            | Self::Json { context: c, .. }
            | Self::MalformedOutput { context: c, .. }
            | Self::Search { context: c, .. }
            | Self::InvalidInput { context: c, .. }
            | Self::Other { context: c, .. } => *c = ctx,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_sets_context() {
        let err = PonderError::llm("boom").with_context("asking the expert model");
        assert_eq!(err.context(), Some("asking the expert model"));
        assert_eq!(err.error_code(), "PONDER_LLM");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(PonderError::http_with_status("too many requests", 429).is_retryable());
        assert!(!PonderError::http_with_status("unauthorized", 401).is_retryable());
        assert!(PonderError::llm("timeout: operation timed out").is_retryable());
        assert!(!PonderError::llm("401 Unauthorized").is_retryable());
        assert!(!PonderError::cache("disk full").is_retryable());
    }

    #[test]
    fn test_api_status_decides_retry() {
        let server_error = PonderError::llm_with_status("API error (status 500): oops", "m", 500);
        assert!(server_error.is_retryable());
        assert_eq!(server_error.status_code(), Some(500));
        assert!(PonderError::llm_with_status("API error (status 429): slow down", "m", 429).is_retryable());

        let misleading = PonderError::llm_with_status(
            "API error (status 400): connection timeout field is invalid",
            "m",
            400,
        );
        assert!(!misleading.is_retryable());
    }

    #[test]
    fn test_external_classification() {
        assert!(PonderError::llm("x").is_external());
        assert!(PonderError::search("x").is_external());
        assert!(!PonderError::malformed_output("x", "{").is_external());
        assert!(!PonderError::cache("x").is_external());
    }
}
