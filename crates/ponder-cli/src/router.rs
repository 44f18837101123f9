//! Command routing logic for CLI

use crate::args::{CacheAction, Cli, Commands, ConfigAction, join_words};
use crate::commands;
use crate::console::CliConsole;
use ponder_core::{PonderConfig, PonderResult};
use std::process::ExitCode;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: PonderConfig) -> PonderResult<ExitCode> {
    let console = CliConsole::new(cli.verbose);

    match cli.command {
        Commands::Chat { workflow } => {
            commands::chat::run(workflow, &config, &console).await?;
        }
        Commands::Ask { workflow, query } => {
            return commands::ask::run(workflow, &join_words(&query), &config, &console).await;
        }
        Commands::Compose { topic } => {
            commands::compose::run(&join_words(&topic), &config, &console).await?;
        }
        Commands::Cache {
            action: CacheAction::Show { workflow },
        } => {
            commands::cache::show(workflow, &config, &console).await?;
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => {
            commands::config::show(&cli.config_file, &config, &console).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
