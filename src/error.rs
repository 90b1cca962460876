//! Error types for the potter-mcp library.

use thiserror::Error;

/// Unified error type for running the server.
#[derive(Debug, Error)]
pub enum PotterError {
    /// Catalog API error
    #[error("Catalog error: {0}")]
    Api(#[from] crate::catalog::ApiError),

    /// Tool-related error
    #[error("Tool error: {0}")]
    Tool(#[from] crate::tool::ToolError),

    /// MCP-related error
    #[error("MCP error: {0}")]
    MCP(#[from] crate::mcp::MCPError),
}
