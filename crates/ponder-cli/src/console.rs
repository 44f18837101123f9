//! CLI console utilities

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use ponder_core::{AnswerSource, Side};
use std::io::{self, Write};
use std::time::Duration;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    /// Create a new CLI console
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print the input prompt without a newline
    pub fn prompt(&self) -> io::Result<()> {
        print!("{} ", "›".cyan().bold());
        io::stdout().flush()
    }

    /// Spinner shown while a run has produced nothing yet
    pub fn thinking(&self) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Print one streamed fragment as it arrives
    pub fn fragment(&self, fragment: &str) {
        print!("{}", fragment);
        io::stdout().flush().ok();
    }

    /// Print one labelled side-by-side fragment
    pub fn side_fragment(&self, side: Side, fragment: &str) {
        let line = fragment.replace('\n', " ");
        match side {
            Side::Left => println!("{} {}", side_label(side).magenta().bold(), line),
            Side::Right => println!("{} {}", side_label(side).cyan().bold(), line),
        }
    }

    /// Print the source tag, attempts and elapsed time of an answer
    pub fn answer_footer(&self, source: AnswerSource, attempts: u32, elapsed: Duration) {
        let tag = format!("[{}]", source);
        let tag = match source {
            AnswerSource::Cache => tag.green().bold(),
            AnswerSource::Fast => tag.yellow().bold(),
            AnswerSource::Expert => tag.blue().bold(),
        };
        println!(
            "{} {}",
            tag,
            format!("attempts: {} · {:.2}s", attempts, elapsed.as_secs_f64()).dimmed()
        );
    }

    /// Print a key/value row, truncating long values
    pub fn entry(&self, key: &str, value: &str) {
        println!("{} {}", key.bold(), "→".dimmed());
        println!("  {}", truncate_display(value, 120));
    }
}

/// Label printed in front of a side-by-side fragment
pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Left => "[感性]",
        Side::Right => "[理性]",
    }
}

/// First `max_chars` characters on one line, with an ellipsis when cut
pub fn truncate_display(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
