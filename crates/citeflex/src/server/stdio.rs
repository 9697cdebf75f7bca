//! Stdio transport for MCP protocol.
//!
//! Handles newline-delimited JSON-RPC 2.0 over stdin/stdout.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::rpc::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR, handle_request};
use crate::tools::{McpTool, ToolContext};

/// Serve MCP requests from stdin until it closes.
///
/// # Errors
///
/// Returns error on I/O failure.
pub async fn run_stdio(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> anyhow::Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    tracing::info!("MCP stdio server ready, waiting for requests");

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("Stdin closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(req) => req,
            Err(e) => {
                write_response(&mut stdout, &JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}")))
                    .await?;
                continue;
            }
        };

        tracing::debug!(method = %request.method, "Received request");

        if let Some(response) = handle_request(&request, &tools, &ctx).await {
            write_response(&mut stdout, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(out: &mut W, response: &JsonRpcResponse) -> anyhow::Result<()> {
    let response_json = serde_json::to_string(response)?;
    out.write_all(response_json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
