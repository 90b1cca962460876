use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::tool::{ToolDefinition, ToolError, ToolRegistry, ToolResult};

/// Dispatches named tool calls to the registry.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    /// Creates a new tool executor with the given registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns all tool definitions for `tools/list`.
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.to_tool_definitions()
    }

    /// Executes a single tool call.
    ///
    /// Upstream failures come back as an error [`ToolResult`]; unknown tools and
    /// bad arguments are returned as `Err` so the caller can report them as
    /// protocol errors.
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        let tool = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(tool = name, "Executing tool");

        match tool.execute(arguments).await {
            Ok(result) => Ok(result),
            Err(ToolError::Upstream(error)) => {
                warn!(tool = name, %error, "Tool call failed upstream");
                Ok(ToolResult::error(error.to_string()))
            }
            Err(error) => Err(error),
        }
    }
}
