//! Tools a model may call during the tool-agent workflow
//!
//! A [`Tool`] describes itself with a [`ToolSchema`] that is sent in the
//! request's `tools` array. When the model answers with tool calls, the
//! [`ToolRegistry`] dispatches each [`ToolCall`] by name.

pub mod base;
pub mod registry;
pub mod types;
pub mod weather;

pub use base::Tool;
pub use registry::ToolRegistry;
pub use types::{ToolCall, ToolSchema};
pub use weather::WeatherTool;
