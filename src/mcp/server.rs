use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::codec::{InboundLine, JsonLinesCodec};
use super::protocol::{
    CallToolParams, CallToolResult, CancelledParams, DEFAULT_PROTOCOL_VERSION, IncomingMessage,
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcResponse, RequestId,
    ServerCapabilities, ServerInfo, ToolsCapability, ToolsListResult,
};
use crate::tool::{ToolError, ToolExecutor};

/// Errors from the MCP transport.
#[derive(Debug, thiserror::Error)]
pub enum MCPError {
    /// Reading or writing a line failed
    #[error("Transport error: {0}")]
    Transport(#[from] LinesCodecError),
    /// The response writer stopped unexpectedly
    #[error("Writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;
type Outbox = mpsc::UnboundedSender<String>;

/// MCP server speaking newline-delimited JSON-RPC.
#[derive(Debug, Clone)]
pub struct MCPServer {
    executor: ToolExecutor,
    info: ServerInfo,
}

impl MCPServer {
    /// Creates a server that dispatches `tools/call` through `executor`.
    pub fn new(executor: ToolExecutor) -> Self {
        Self {
            executor,
            info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serves on the process stdin/stdout until stdin closes.
    pub async fn serve_stdio(self) -> Result<(), MCPError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves requests read from `reader`, writing responses to `writer`.
    ///
    /// Returns once the input is exhausted and every in-flight call has finished.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), MCPError>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, JsonLinesCodec::new());
        let (outbox, rx) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_responses(writer, rx));
        let in_flight: InFlight = Arc::default();
        let mut calls = JoinSet::new();
        let mut read_error = None;

        info!(server = %self.info.name, version = %self.info.version, "MCP server started");

        loop {
            tokio::select! {
                frame = lines.next() => match frame {
                    Some(Ok(InboundLine::Text(line))) => {
                        self.handle_line(&line, &outbox, &in_flight, &mut calls).await;
                    }
                    Some(Ok(InboundLine::Malformed(reason))) => {
                        warn!(%reason, "Unreadable message");
                        send(&outbox, &JsonRpcResponse::failure(None, JsonRpcError::parse_error(reason)));
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Failed to read from client");
                        read_error = Some(e);
                        break;
                    }
                    None => break,
                },
                Some(_) = calls.join_next(), if !calls.is_empty() => {}
            }
        }

        debug!(pending = calls.len(), "Input closed, draining in-flight calls");
        while calls.join_next().await.is_some() {}

        drop(outbox);
        writer_task.await??;

        if let Some(e) = read_error {
            return Err(e.into());
        }

        info!("MCP server stopped");
        Ok(())
    }

    async fn handle_line(
        &self,
        line: &str,
        outbox: &Outbox,
        in_flight: &InFlight,
        calls: &mut JoinSet<()>,
    ) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let message: IncomingMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                send(outbox, &JsonRpcResponse::failure(None, JsonRpcError::parse_error(e)));
                return;
            }
        };

        let IncomingMessage { id, method, params } = message;

        let Some(method) = method else {
            match id {
                Some(id) => send(
                    outbox,
                    &JsonRpcResponse::failure(
                        Some(id),
                        JsonRpcError::invalid_request("Missing method"),
                    ),
                ),
                None => debug!("Ignoring message without method"),
            }
            return;
        };

        let Some(id) = id else {
            self.handle_notification(&method, params, in_flight).await;
            return;
        };

        debug!(%method, ?id, "Handling request");

        match method.as_str() {
            "tools/call" => {
                let token = CancellationToken::new();
                {
                    let mut pending = in_flight.lock().await;
                    if pending.contains_key(&id) {
                        drop(pending);
                        warn!(?id, "Duplicate in-flight request id");
                        send(
                            outbox,
                            &JsonRpcResponse::failure(
                                Some(id),
                                JsonRpcError::invalid_request("Request id is already in flight"),
                            ),
                        );
                        return;
                    }
                    pending.insert(id.clone(), token.clone());
                }

                let executor = self.executor.clone();
                let outbox = outbox.clone();
                let in_flight = in_flight.clone();
                calls.spawn(async move {
                    let response = tokio::select! {
                        _ = token.cancelled() => None,
                        response = call_tool(&executor, id.clone(), params) => Some(response),
                    };
                    in_flight.lock().await.remove(&id);
                    match response {
                        Some(response) => send(&outbox, &response),
                        None => debug!(?id, "Tool call cancelled"),
                    }
                });
            }
            _ => send(outbox, &self.handle_request(id, &method, params)),
        }
    }

    fn handle_request(&self, id: RequestId, method: &str, params: Value) -> JsonRpcResponse {
        match method {
            "initialize" => {
                let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
                JsonRpcResponse::success(
                    id,
                    InitializeResult {
                        protocol_version: params
                            .protocol_version
                            .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
                        capabilities: ServerCapabilities {
                            tools: ToolsCapability {
                                list_changed: false,
                            },
                        },
                        server_info: self.info.clone(),
                    },
                )
            }
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ToolsListResult {
                    tools: self.executor.get_tool_definitions(),
                },
            ),
            _ => {
                warn!(%method, "Unknown method");
                JsonRpcResponse::failure(Some(id), JsonRpcError::method_not_found(method))
            }
        }
    }

    async fn handle_notification(&self, method: &str, params: Value, in_flight: &InFlight) {
        match method {
            "notifications/cancelled" => {
                let params: CancelledParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(e) => {
                        warn!(error = %e, "Malformed cancellation");
                        return;
                    }
                };
                match in_flight.lock().await.get(&params.request_id) {
                    Some(token) => {
                        debug!(id = ?params.request_id, reason = ?params.reason, "Cancelling tool call");
                        token.cancel();
                    }
                    None => debug!(id = ?params.request_id, "Cancellation for unknown request"),
                }
            }
            _ => debug!(%method, "Notification received"),
        }
    }
}

async fn call_tool(executor: &ToolExecutor, id: RequestId, params: Value) -> JsonRpcResponse {
    let params: CallToolParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            return JsonRpcResponse::failure(Some(id), JsonRpcError::invalid_params(e.to_string()));
        }
    };

    match executor.execute(&params.name, params.arguments).await {
        Ok(result) => JsonRpcResponse::success(id, CallToolResult::from(result)),
        Err(ToolError::NotFound(name)) => JsonRpcResponse::failure(
            Some(id),
            JsonRpcError::invalid_params(format!("Unknown tool: {}", name)),
        ),
        Err(e) => JsonRpcResponse::failure(Some(id), JsonRpcError::invalid_params(e.to_string())),
    }
}

fn send(outbox: &Outbox, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if outbox.send(line).is_err() {
                warn!("Response writer closed, dropping response");
            }
        }
        Err(e) => error!(error = %e, "Failed to encode response"),
    }
}

async fn write_responses<W>(writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> Result<(), MCPError>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, JsonLinesCodec::new());
    while let Some(line) = rx.recv().await {
        sink.send(line).await?;
    }
    Ok(())
}
