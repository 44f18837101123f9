//! Cache inspection commands

use crate::console::CliConsole;
use ponder_core::{PonderConfig, PonderResult, WorkflowKind, open_cache};

/// List every entry in a workflow's cache file
pub async fn show(kind: WorkflowKind, config: &PonderConfig, console: &CliConsole) -> PonderResult<()> {
    let cache = open_cache(kind, config);
    console.print_header(&format!("{} cache", kind));
    println!("{}", cache.path().display());

    let entries = cache.entries().await;
    if entries.is_empty() {
        console.warn("cache is empty");
        return Ok(());
    }

    for (key, value) in &entries {
        console.entry(key, value);
    }
    console.success(&format!("{} entries", entries.len()));
    Ok(())
}
