//! MCP server and JSON API.
//!
//! Stdio carries MCP only; HTTP serves the JSON API alongside MCP on `/mcp`.

pub mod http;
pub mod rpc;
pub mod stdio;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use crate::resolver::Citeflex;
use crate::tools::{self, McpTool, ToolContext};

/// Citation server.
pub struct McpServer {
    /// Tool execution context.
    ctx: ToolContext,

    /// Registered tools.
    tools: Vec<Box<dyn McpTool>>,
}

impl McpServer {
    /// Server with every tool registered.
    #[must_use]
    pub fn new(citeflex: Citeflex) -> Self {
        let ctx = ToolContext::new(Arc::new(citeflex));
        let tools = tools::register_all_tools();

        Self { ctx, tools }
    }

    /// Serve MCP on stdin/stdout until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!(tools = self.tools.len(), "Starting MCP server in stdio mode");

        stdio::run_stdio(self.tools, self.ctx).await
    }

    /// HTTP router, without binding a socket.
    #[must_use]
    pub fn into_router(self) -> Router {
        http::create_router(self.tools, self.ctx)
    }

    /// Serve the JSON API and `/mcp` on `0.0.0.0:port` until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(tools = self.tools.len(), "Starting HTTP server on port {port}");

        let router = self.into_router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP server listening on http://{addr}");

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }

    /// Registered tool by MCP name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// Name and description of every tool, in registration order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<(&str, &str)> {
        self.tools.iter().map(|t| (t.name(), t.description())).collect()
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.tools.len()).finish()
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
