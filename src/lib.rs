//! # Potter MCP
//!
//! An MCP server exposing the public Harry Potter catalog API
//! (`https://potterapi-fedeperin.vercel.app`) as four tools.
//!
//! ## Tools
//!
//! - **GetBooks**: every book in the chosen language
//! - **GetRandomBook**: one random book
//! - **GetCharacters**: characters, optionally narrowed by an upstream search
//! - **GetRandomCharacter**: one random character
//!
//! Every tool takes a `language` (`en`, `es`, `fr`, `it`, `pt`, `uk`; default `en`)
//! and answers with plain text records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use potter_mcp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::builder().build()?;
//!
//!     // Call an operation directly
//!     let text = get_random_character(&client, Language::En).await?;
//!     println!("{}", text);
//!
//!     // Or serve every tool over stdio
//!     ServerConfig::default().run_stdio().await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tool;

// Re-exports for convenient usage
pub use catalog::{
    ApiError, Book, CatalogClient, CatalogClientBuilder, CatalogSource, Character, Language,
    get_books, get_characters, get_random_book, get_random_character,
};
pub use config::ServerConfig;
pub use error::PotterError;
pub use mcp::{MCPError, MCPServer};
pub use tool::{DynTool, Tool, ToolDefinition, ToolError, ToolExecutor, ToolRegistry, ToolResult};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::catalog::{
        CatalogClient, CatalogSource, Language, get_books, get_characters, get_random_book,
        get_random_character,
    };
    pub use crate::config::ServerConfig;
    pub use crate::mcp::MCPServer;
    pub use crate::tool::{Tool, ToolExecutor, ToolRegistry, catalog_registry};
}
