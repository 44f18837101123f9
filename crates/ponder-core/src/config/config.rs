//! Main configuration for Ponder

use super::logging_config::LoggingConfig;
use super::model_params::ModelParameters;
use crate::error::{PonderError, PonderResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for Ponder
///
/// All fields support serde(default) so a partial configuration file is
/// filled in with defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PonderConfig {
    /// Model used for the full path (answers, critiques, judgments)
    pub expert: ModelParameters,
    /// Cheap model used for the pattern-matched fast path
    pub fast: ModelParameters,
    /// Answer loop settings
    pub agent: AgentConfig,
    /// Search collaborator settings
    pub search: SearchConfig,
    /// Answer cache settings
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings for the bounded answer loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of act/evaluate rounds before forced termination
    pub attempt_cap: u32,
    /// Substrings that send a query down the fast path
    pub fast_path_keywords: Vec<String>,
    /// Stream expert answers to the terminal as they arrive
    pub stream_expert: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            attempt_cap: 3,
            fast_path_keywords: ["你好", "嗨", "早安", "哈囉"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            stream_expert: true,
        }
    }
}

/// Settings for web search and page reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of a SearXNG instance
    pub base_url: String,
    /// Number of hits requested per search
    pub limit: usize,
    /// Maximum characters of page text handed to the reader model
    pub page_char_limit: usize,
    /// Timeout for search and page fetch requests in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            limit: 3,
            page_char_limit: 8000,
            timeout_secs: 20,
        }
    }
}

/// Settings for the persisted answer caches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one JSON cache file per workflow
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let dir = dirs::cache_dir()
            .map(|dir| dir.join("ponder"))
            .unwrap_or_else(|| PathBuf::from(".ponder-cache"));
        Self { dir }
    }
}

impl CacheConfig {
    /// Path of a cache file inside the cache directory
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Default for PonderConfig {
    fn default() -> Self {
        Self {
            expert: ModelParameters::default(),
            fast: ModelParameters::fast_default(),
            agent: AgentConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PonderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> PonderResult<()> {
        self.expert
            .validate()
            .map_err(|e| e.with_context("validating [expert] model"))?;
        self.fast
            .validate()
            .map_err(|e| e.with_context("validating [fast] model"))?;

        if self.agent.attempt_cap == 0 {
            return Err(PonderError::config("agent.attempt_cap must be at least 1"));
        }

        if self.search.limit == 0 {
            return Err(PonderError::config("search.limit must be at least 1"));
        }

        if !self.search.base_url.starts_with("http://")
            && !self.search.base_url.starts_with("https://")
        {
            return Err(PonderError::config(format!(
                "Invalid search.base_url '{}': must start with http:// or https://",
                self.search.base_url
            )));
        }

        if !self.logging.is_valid_level() {
            return Err(PonderError::config(format!(
                "Invalid logging.level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Copy suitable for display, with API keys masked
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.expert = self.expert.masked();
        config.fast = self.fast.masked();
        config
    }
}
