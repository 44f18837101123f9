//! Ponder Core Library
//!
//! Cache-gated, bounded-iteration answering over language models: an answer
//! cache consulted once per query, a pure router, and a controller that runs
//! a workflow's act/evaluate loop up to a fixed number of attempts.

pub mod agent;
pub mod cache;
pub mod config;
pub mod error;
pub mod fanout;
pub mod llm;
pub mod search;
pub mod tools;
pub mod workflows;

// Re-export commonly used types
pub use agent::{
    AnswerSource, Controller, ConversationState, Decision, Responder, Router, RunContext,
    RunOutcome, StateDelta, Workflow,
};
pub use cache::{AnswerCache, CacheStatistics, JsonFileCache, KeyPolicy, MemoryCache};
pub use config::{PonderConfig, load_config};
pub use error::{PonderError, PonderResult};
pub use fanout::{Composer, Composition, Side};
pub use llm::{LlmClient, LlmMessage};
pub use tools::{Tool, ToolCall, ToolRegistry, ToolSchema};
pub use workflows::{WorkflowKind, build_controller, open_cache};
