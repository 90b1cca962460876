pub mod catalog;
pub mod executor;
pub mod registry;

pub use catalog::{
    GetBooksTool, GetCharactersTool, GetRandomBookTool, GetRandomCharacterTool, catalog_registry,
    register_catalog_tools,
};
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use tool_trait::DynTool;
pub use tool_trait::Tool;
pub use tool_types::{ToolDefinition, ToolError, ToolResult};

mod tool_types {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::catalog::ApiError;

    /// Definition of a tool as advertised to the MCP client.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ToolDefinition {
        /// The name of the tool
        pub name: String,
        /// A description of what the tool does
        pub description: String,
        /// JSON Schema for the tool's input parameters
        pub input_schema: Value,
    }

    /// The result of executing a tool.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ToolResult {
        /// The text block handed back to the client
        pub output: String,
        /// Whether the text describes a failure
        pub is_error: bool,
    }

    impl ToolResult {
        /// Creates a successful result.
        pub fn ok(output: impl Into<String>) -> Self {
            Self {
                output: output.into(),
                is_error: false,
            }
        }

        /// Creates a result with an error.
        pub fn error(error: impl Into<String>) -> Self {
            Self {
                output: error.into(),
                is_error: true,
            }
        }
    }

    /// Errors that can occur when executing a tool.
    #[derive(Debug, thiserror::Error)]
    pub enum ToolError {
        #[error("Invalid arguments: {0}")]
        InvalidArguments(String),
        #[error("Upstream request failed: {0}")]
        Upstream(#[from] ApiError),
        #[error("Tool not found: {0}")]
        NotFound(String),
    }
}

mod tool_trait {
    use super::tool_types::{ToolDefinition, ToolError, ToolResult};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    /// A named operation callable through `tools/call`.
    #[async_trait]
    pub trait Tool: Send + Sync {
        /// Returns the name of the tool.
        fn name(&self) -> &str;
        /// Returns a description of what the tool does.
        fn description(&self) -> &str;
        /// Returns the JSON Schema for the tool's input parameters.
        fn parameters_schema(&self) -> Value;

        /// Executes the tool with the given arguments.
        async fn execute(&self, args: Value) -> Result<ToolResult, ToolError>;

        /// Converts the tool to its definition.
        fn to_definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input_schema: self.parameters_schema(),
            }
        }
    }

    /// A type alias for a dynamic tool reference.
    pub type DynTool = Arc<dyn Tool>;
}
