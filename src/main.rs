//! # potter-mcp
//!
//! Runs the catalog MCP server on stdin/stdout.
//!
//! ```bash
//! potter-mcp --log-level debug
//! POTTER_API_BASE_URL=http://localhost:3000 potter-mcp --timeout-secs 10
//! ```

use anyhow::Context;
use clap::Parser;
use potter_mcp::ServerConfig;
use potter_mcp::catalog::DEFAULT_BASE_URL;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// MCP server for the Harry Potter books and characters catalog
#[derive(Parser, Debug)]
#[command(name = "potter-mcp", version)]
struct Args {
    /// Catalog API base URL
    #[arg(long, env = "POTTER_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds (HTTP client default when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            base_url: args.base_url,
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    ServerConfig::from(args)
        .run_stdio()
        .await
        .context("MCP server failed")
}
