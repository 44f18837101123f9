//! Core error types for Ponder

use thiserror::Error;

/// Result type alias for Ponder operations
pub type PonderResult<T> = Result<T, PonderError>;

/// Main error type for Ponder
///
/// Each variant carries an optional context string describing where the
/// error happened. Use the constructor helpers (`PonderError::llm(..)`,
/// `PonderError::cache(..)`) rather than building variants by hand.
#[derive(Error, Debug, Clone)]
pub enum PonderError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// LLM responder errors (transport or API level)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        model: Option<String>,
        /// HTTP status of the failed API call; `None` for transport failures
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Answer cache errors
    #[error("Cache error: {message}")]
    Cache {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// A structured response did not match the requested schema
    #[error("Malformed structured output: {message}")]
    MalformedOutput {
        message: String,
        raw: Option<String>,
        context: Option<String>,
    },

    /// Search or page reading errors
    #[error("Search error: {message}")]
    Search {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}

impl PonderError {
    /// Short machine-readable code for the error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "PONDER_CONFIG",
            Self::Llm { .. } => "PONDER_LLM",
            Self::Http { .. } => "PONDER_HTTP",
            Self::Cache { .. } => "PONDER_CACHE",
            Self::Io { .. } => "PONDER_IO",
            Self::Json { .. } => "PONDER_JSON",
            Self::MalformedOutput { .. } => "PONDER_MALFORMED_OUTPUT",
            Self::Search { .. } => "PONDER_SEARCH",
            Self::InvalidInput { .. } => "PONDER_INVALID_INPUT",
            Self::Other { .. } => "PONDER_OTHER",
        }
    }

    /// Optional context attached to the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Llm { context, .. }
            | Self::Http { context, .. }
            | Self::Cache { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::MalformedOutput { context, .. }
            | Self::Search { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Llm { status_code, .. } | Self::Http { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Check if this error is worth retrying at the transport level.
    ///
    /// API failures retry on 429 and 5xx. Failures without a status (timeouts,
    /// refused connections) retry as well. Only the LLM client consults this;
    /// the controller never retries a failed step on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm {
                status_code: Some(code),
                ..
            }
            | Self::Http {
                status_code: Some(code),
                ..
            } => *code == 429 || *code >= 500,
            Self::Llm {
                message,
                status_code: None,
                ..
            } => {
                let msg = message.to_lowercase();
                msg.contains("timeout") || msg.contains("connection") || msg.contains("overloaded")
            }
            Self::Http {
                status_code: None, ..
            } => true,
            _ => false,
        }
    }

    /// Whether the error comes from the external responder or search side
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::Llm { .. } | Self::Http { .. } | Self::Search { .. }
        )
    }
}
