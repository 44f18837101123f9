//! Ponder CLI application
//!
//! Runs the cache-gated answer loops from the command line.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/ponder-cli
//! ```
//!
//! # Commands
//!
//! - `ponder chat <workflow>`: read loop over translation, qa, research or tools
//! - `ponder ask <workflow> <query>`: one run, exit code 1 on failure
//! - `ponder compose <topic>`: two posts streamed side by side
//! - `ponder cache show <workflow>` and `ponder config show`
//!
//! Set `RUST_LOG=debug` for verbose logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;
use console::CliConsole;
use ponder_core::load_config;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = CliConsole::new(cli.verbose);

    let config = match load_config(Some(Path::new(&cli.config_file))) {
        Ok(config) => config,
        Err(e) => {
            console.error(&format!("[{}] {}", e.error_code(), e));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging, cli.verbose) {
        console.warn(&e.to_string());
    }

    match router::route(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            console.error(&format!("[{}] {}", e.error_code(), e));
            ExitCode::FAILURE
        }
    }
}
