//! Stdio transport for MCP protocol.
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Stdout carries protocol
//! messages only; logs go to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{JsonRpcResponse, McpHandler};

/// Serve MCP over the process's stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns error on I/O failure.
pub async fn run_stdio(handler: &McpHandler) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    serve(handler, reader, tokio::io::stdout()).await
}

/// Serve MCP over any line-oriented reader/writer pair.
///
/// # Errors
///
/// Returns error on I/O failure.
pub async fn serve<R, W>(handler: &McpHandler, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
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

        if let Some(response) = handler.handle_message(trimmed).await {
            write_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> anyhow::Result<()> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
