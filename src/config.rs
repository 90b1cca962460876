use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::catalog::{CatalogClient, DEFAULT_BASE_URL};
use crate::error::PotterError;
use crate::mcp::MCPServer;
use crate::tool::{ToolExecutor, catalog_registry};

/// Runtime settings for the stdio server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Catalog API base address
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; `None` keeps the HTTP stack default
    #[serde(default)]
    pub timeout: Option<Duration>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
        }
    }
}

impl ServerConfig {
    /// Builds the shared catalog client.
    pub fn build_client(&self) -> Result<CatalogClient, PotterError> {
        let mut builder = CatalogClient::builder().with_base_url(&self.base_url);
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// Builds the MCP server with the catalog tools registered.
    pub fn build_server(&self) -> Result<MCPServer, PotterError> {
        let client = Arc::new(self.build_client()?);
        let registry = Arc::new(catalog_registry(client));
        Ok(MCPServer::new(ToolExecutor::new(registry)))
    }

    /// Runs the server on stdin/stdout until the client disconnects.
    pub async fn run_stdio(self) -> Result<(), PotterError> {
        info!(base_url = %self.base_url, timeout = ?self.timeout, "Starting catalog MCP server");
        self.build_server()?.serve_stdio().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_public_api() {
        let config = ServerConfig::default();
        assert_eq!(config.base_url, "https://potterapi-fedeperin.vercel.app");
        assert!(config.timeout.is_none());
        assert!(config.build_server().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_base_url_fails_to_build() {
        let config = ServerConfig {
            base_url: "::nope::".to_string(),
            timeout: Some(Duration::from_secs(1)),
        };
        assert!(matches!(config.build_client(), Err(PotterError::Api(_))));
    }
}
