//! MCP stdio server
//!
//! Newline-delimited JSON-RPC 2.0 exposing [`crate::tools`] to a Model
//! Context Protocol host. Only the tool methods are implemented.

use crate::confluent::client::ConfluentClient;
use crate::tools::{Tool, ToolCall};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;

pub const SERVER_NAME: &str = "FlinkMCP";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Incoming request or notification
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Tool server bound to one client
#[derive(Clone)]
pub struct McpServer {
    client: ConfluentClient,
}

impl McpServer {
    pub fn new(client: ConfluentClient) -> Self {
        Self { client }
    }

    /// Serve requests until the reader hits EOF.
    ///
    /// Each request runs on its own task, so a slow tool call never holds
    /// up `ping` or later requests. Responses are written in completion
    /// order, one line each, by this loop alone.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut pending: JoinSet<Option<Response>> = JoinSet::new();
        let mut buf = Vec::new();
        let mut input_open = true;

        loop {
            tokio::select! {
                // Partial reads stay in `buf` if the other branch wins
                read = reader.read_until(b'\n', &mut buf), if input_open => {
                    if read.context("Failed to read request")? == 0 {
                        tracing::info!("Input closed, finishing {} pending requests", pending.len());
                        input_open = false;
                        continue;
                    }
                    let line = std::mem::take(&mut buf);
                    let server = self.clone();
                    pending.spawn(async move { server.handle_bytes(&line).await });
                }
                Some(joined) = pending.join_next(), if !pending.is_empty() => {
                    match joined {
                        Ok(Some(response)) => write_response(&mut writer, &response).await?,
                        Ok(None) => {}
                        Err(e) => tracing::error!("Request task failed: {}", e),
                    }
                }
                else => break,
            }
        }

        tracing::info!("All requests answered, shutting down");
        Ok(())
    }

    /// Handle one raw input line, which may not be valid UTF-8
    pub async fn handle_bytes(&self, bytes: &[u8]) -> Option<Response> {
        let line = match std::str::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Request is not valid UTF-8: {}", e);
                return Some(Response::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
            }
        };

        if line.trim().is_empty() {
            return None;
        }

        self.handle_line(line).await
    }

    /// Handle one raw line; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Unparsable request: {}", e);
                return Some(Response::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
            }
        };

        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::error(
                    Value::Null,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        self.handle(request).await
    }

    /// Dispatch a parsed request
    pub async fn handle(&self, request: Request) -> Option<Response> {
        if request.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
            tracing::debug!("Unexpected jsonrpc version {:?}", request.jsonrpc);
        }

        // Notifications never get a response
        let Some(id) = request.id else {
            tracing::debug!("Notification: {}", request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Response::result(id, initialize_result(&request.params)),
            "ping" => Response::result(id, json!({})),
            "tools/list" => Response::result(id, list_tools_result()),
            "tools/call" => match serde_json::from_value::<CallParams>(request.params) {
                Ok(params) => Response::result(id, self.call_tool(&params.name, &params.arguments).await),
                Err(e) => Response::error(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
            },
            other => Response::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        };

        Some(response)
    }

    /// Run a tool; bad names or arguments are reported in-band
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Value {
        let call = match ToolCall::parse(name, arguments) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!("Rejected tool call {}: {:#}", name, e);
                return json!({
                    "content": [{"type": "text", "text": format!("{:#}", e)}],
                    "isError": true,
                });
            }
        };

        tracing::info!("Tool call: {:?}", call);

        let content: Vec<Value> = call
            .run(&self.client)
            .await
            .into_texts()
            .into_iter()
            .map(|text| json!({"type": "text", "text": text}))
            .collect();

        json!({"content": content, "isError": false})
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_string(response).context("Failed to encode response")?;
    encoded.push('\n');
    writer
        .write_all(encoded.as_bytes())
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush response")?;
    Ok(())
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
    })
}

fn list_tools_result() -> Value {
    let tools: Vec<Value> = Tool::ALL
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name(),
                "description": tool.description(),
                "inputSchema": tool.input_schema(),
            })
        })
        .collect();

    json!({ "tools": tools })
}
