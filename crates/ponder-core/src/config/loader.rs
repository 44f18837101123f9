//! Configuration loading from layered sources
//!
//! Sources are applied in the order they were added: a file source replaces
//! the configuration built so far, while the environment source overrides
//! individual fields. Validation runs once, after the last source.

use super::config::PonderConfig;
use super::env_loader;
use super::file_loader;
use crate::error::PonderResult;
use std::path::{Path, PathBuf};

/// A configuration source
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// JSON, TOML or YAML file
    File(PathBuf),
    /// `PONDER_*` environment variables
    Environment,
}

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources
    pub fn load(self) -> PonderResult<PonderConfig> {
        let mut config = PonderConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    tracing::debug!("Loading default config");
                    config = PonderConfig::default();
                }
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config = file_loader::load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying config overrides from environment");
                    env_loader::apply_env(&mut config)?;
                }
            }
        }

        config.validate()?;
        tracing::debug!(
            expert_model = %config.expert.model,
            fast_model = %config.fast.model,
            attempt_cap = config.agent.attempt_cap,
            "configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
