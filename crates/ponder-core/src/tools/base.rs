//! Base trait for tools

use super::types::{ToolCall, ToolSchema};
use crate::error::PonderResult;
use async_trait::async_trait;

/// A function the model can ask to run.
///
/// The output string goes back to the model verbatim as the tool message.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    async fn execute(&self, call: &ToolCall) -> PonderResult<String>;

    /// Short rendering for logs
    fn render_call(&self, call: &ToolCall) -> String {
        format!("{}({})", self.name(), call.arguments_json())
    }
}
