//! Interactive read loop

use super::{answer_once, is_exit_command};
use crate::console::CliConsole;
use ponder_core::{PonderConfig, PonderResult, WorkflowKind, build_controller};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Read queries from stdin and answer them until exit, quit, q or EOF
pub async fn run(kind: WorkflowKind, config: &PonderConfig, console: &CliConsole) -> PonderResult<()> {
    let controller = build_controller(kind, config)?;
    info!(workflow = %kind, "chat started");

    console.print_header(&format!("ponder · {}", kind));
    println!("{}", kind.greeting());
    println!("(exit / quit / q to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        console.prompt()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let query = line.trim();
        if is_exit_command(query) {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let outcome = answer_once(&controller, query, console).await;
        if let Some(error) = outcome.error() {
            console.error(&format!("[{}] {}", error.error_code(), error));
        }
    }

    let stats = controller.cache().statistics();
    info!(workflow = %kind, stats = %stats, "chat ended");
    console.info(&format!("cache: {}", stats));
    console.success("bye");
    Ok(())
}
