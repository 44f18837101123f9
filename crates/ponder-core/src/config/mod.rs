//! Configuration management for Ponder

#[allow(clippy::module_inception)] // config module in config directory is intentional
mod config;
mod env_loader;
mod file_loader;
mod logging_config;
mod model_params;

pub mod loader;

pub use config::{AgentConfig, CacheConfig, PonderConfig, SearchConfig};
pub use loader::{ConfigLoader, ConfigSource};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model_params::ModelParameters;

use crate::error::PonderResult;
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ponder_config.json";

/// Load configuration from defaults, an optional file, and the environment
pub fn load_config(config_file: Option<&Path>) -> PonderResult<PonderConfig> {
    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = config_file {
        loader = loader.with_file(path);
    }
    loader.with_env().load()
}
