//! MCP server implementation.
//!
//! Provides both stdio and streamable HTTP transports over one
//! [`McpHandler`](protocol::McpHandler).

pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod stdio;
pub mod transport;

use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::config::Config;
use crate::tools::{self, McpTool, ToolContext};

use protocol::McpHandler;
use resources::ApiInfo;

/// MCP server for the Semantic Scholar Graph API.
#[derive(Debug)]
pub struct McpServer {
    handler: Arc<McpHandler>,
}

impl McpServer {
    /// Create a new MCP server with all tools registered.
    #[must_use]
    pub fn new(config: &Config, client: SemanticScholarClient) -> Self {
        let ctx = ToolContext::new(Arc::new(client));
        let handler =
            McpHandler::new(tools::register_all_tools(), ctx, ApiInfo::from_config(config));
        Self { handler: Arc::new(handler) }
    }

    /// Shared protocol handler.
    #[must_use]
    pub fn handler(&self) -> Arc<McpHandler> {
        Arc::clone(&self.handler)
    }

    /// Get tool by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.handler.tools().iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!(tools = self.handler.tools().len(), "Starting MCP server in stdio mode");
        stdio::run_stdio(&self.handler).await
    }

    /// Run the server in streamable HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound or the server fails.
    pub async fn run_http(self, host: &str, port: u16) -> anyhow::Result<()> {
        tracing::info!(
            tools = self.handler.tools().len(),
            host,
            port,
            "Starting MCP server in streamable HTTP mode"
        );

        let router = transport::create_router(self.handler());
        let listener = tokio::net::TcpListener::bind((host, port)).await?;

        tracing::info!("HTTP server listening on http://{}/mcp", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
