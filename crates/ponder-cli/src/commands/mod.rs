//! CLI commands

pub mod ask;
pub mod cache;
pub mod chat;
pub mod compose;
pub mod config;

use crate::console::CliConsole;
use ponder_core::{Controller, RunContext, RunOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Words that leave the chat loop
pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit" | "q")
}

/// Run one query, streaming fragments to stdout and printing the answer
/// footer. Failures are returned in the outcome for the caller to report.
pub async fn answer_once(controller: &Controller, query: &str, console: &CliConsole) -> RunOutcome {
    let spinner = console.thinking();
    let streamed = Arc::new(AtomicBool::new(false));

    let sink_spinner = spinner.clone();
    let sink_streamed = streamed.clone();
    let ctx = RunContext::new().with_sink(Arc::new(move |fragment: &str| {
        if !sink_streamed.swap(true, Ordering::SeqCst) {
            sink_spinner.finish_and_clear();
        }
        print!("{}", fragment);
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }));

    let started = Instant::now();
    let outcome = controller.run_with(query, &ctx).await;
    let elapsed = started.elapsed();
    spinner.finish_and_clear();

    if let RunOutcome::Answered {
        answer,
        source,
        attempts,
        ..
    } = &outcome
    {
        if streamed.load(Ordering::SeqCst) {
            println!();
        } else {
            console.fragment(answer);
            println!();
        }
        console.answer_footer(*source, *attempts, elapsed);
    }

    outcome
}
