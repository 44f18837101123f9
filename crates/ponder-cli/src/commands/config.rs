//! Configuration management commands

use crate::console::CliConsole;
use ponder_core::{PonderConfig, PonderResult};
use std::path::Path;

/// Print the effective configuration as JSON with API keys masked
pub async fn show(config_file: &str, config: &PonderConfig, console: &CliConsole) -> PonderResult<()> {
    console.print_header("Configuration");

    if Path::new(config_file).exists() {
        console.success(&format!("Loaded configuration from: {config_file}"));
    } else {
        console.warn(&format!("Configuration file not found: {config_file}"));
        console.info("Using defaults and environment");
    }

    println!("{}", serde_json::to_string_pretty(&config.masked())?);
    Ok(())
}
