//! Tool registry for dispatching model tool calls

use super::base::Tool;
use super::types::{ToolCall, ToolSchema};
use crate::error::{PonderError, PonderResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Tools available to one workflow, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Schemas of every tool, sorted by name so requests are stable
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Run the tool a call names
    pub async fn execute(&self, call: &ToolCall) -> PonderResult<String> {
        let tool = self.get(&call.name).ok_or_else(|| {
            PonderError::invalid_input_field(format!("unknown tool '{}'", call.name), "tool")
        })?;
        debug!(call = %tool.render_call(call), "executing tool");
        tool.execute(call).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
