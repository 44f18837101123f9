//! One-shot run

use super::answer_once;
use crate::console::CliConsole;
use ponder_core::{PonderConfig, PonderResult, WorkflowKind, build_controller};
use std::process::ExitCode;
use tracing::info;

/// Answer a single query; a failed run maps to exit code 1
pub async fn run(
    kind: WorkflowKind,
    query: &str,
    config: &PonderConfig,
    console: &CliConsole,
) -> PonderResult<ExitCode> {
    let controller = build_controller(kind, config)?;
    console.info(&format!(
        "workflow: {}, cache: {}",
        kind,
        config.cache.path_for(kind.cache_file()).display()
    ));

    let outcome = answer_once(&controller, query, console).await;
    let stats = controller.cache().statistics();
    info!(workflow = %kind, stats = %stats, "ask finished");
    console.info(&format!("cache: {}", stats));

    match outcome.into_result() {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            console.error(&format!("[{}] {}", error.error_code(), error));
            Ok(ExitCode::FAILURE)
        }
    }
}
