//! CLI argument definitions using clap
//!
//! - ponder chat <workflow>          # Read loop
//! - ponder ask <workflow> "<query>" # One-shot run
//! - ponder compose "<topic>"        # Side-by-side posts
//! - ponder cache/config             # Utility commands

use clap::{Parser, Subcommand};
use ponder_core::WorkflowKind;

/// Default configuration file name used across all CLI commands.
pub use ponder_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "ponder")]
#[command(about = "Ponder - cache-gated, bounded-retry LLM answer loops")]
#[command(
    long_about = r#"Ponder - cache-gated, bounded-retry LLM answer loops

USAGE:
  ponder chat translation        # Translate interactively
  ponder chat qa                 # Ask questions (greetings take the fast lane)
  ponder ask research "<query>"  # Research once and exit
  ponder ask tools "台北天氣如何"  # Let the model call the weather tool
  ponder compose "<topic>"       # Sentimental and rational posts side by side

UTILITY COMMANDS:
  ponder cache show qa           # List cached answers
  ponder config show             # Show effective configuration

For detailed help: ponder --help"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Enable verbose output and debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer queries in a loop until exit, quit or q
    Chat {
        /// Workflow to run: translation, qa, research or tools
        workflow: WorkflowKind,
    },

    /// Answer one query and exit (exit code 1 on failure)
    Ask {
        /// Workflow to run: translation, qa, research or tools
        workflow: WorkflowKind,

        /// The query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Write a sentimental and a rational post on a topic concurrently
    Compose {
        /// Topic of both posts
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },

    /// Inspect answer caches
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// List the cached entries of a workflow
    Show {
        /// Workflow whose cache to list
        workflow: WorkflowKind,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration with API keys masked
    Show,
}

/// Join free-form words the way the shell split them
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
