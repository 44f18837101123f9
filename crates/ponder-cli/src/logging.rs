//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level. Logs go to stderr so answers on
//! stdout stay clean.

use ponder_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter directive for the configured level, raised to debug when verbose
pub fn directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.level.to_lowercase()
    };
    format!("warn,ponder_core={level},ponder_cli={level}")
}

pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive(config, verbose)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
