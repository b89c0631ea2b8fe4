//! JSON-RPC 2.0 message types and MCP method dispatch.
//!
//! Shared by the stdio and HTTP transports; neither transport knows anything
//! about individual methods.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{prompts, resources};
use crate::tools::{McpTool, ToolContext};

/// Protocol version answered when the client does not send one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

/// JSON-RPC 2.0 request. A missing `id` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: Some(result),
            error: None,
            id: id.unwrap_or(Value::Null),
        }
    }

    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError { code, message: message.into() }),
            id: id.unwrap_or(Value::Null),
        }
    }
}

/// Tool entry of a `tools/list` result.
#[derive(Debug, Serialize)]
pub struct McpToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Dispatches MCP methods to tools, resources and prompts.
pub struct McpHandler {
    tools: Vec<Box<dyn McpTool>>,
    ctx: ToolContext,
    info: resources::ApiInfo,
}

impl McpHandler {
    #[must_use]
    pub fn new(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext, info: resources::ApiInfo) -> Self {
        Self { tools, ctx, info }
    }

    /// Registered tools.
    #[must_use]
    pub fn tools(&self) -> &[Box<dyn McpTool>] {
        &self.tools
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    None,
                    codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(req) => self.handle(req).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Handle a parsed request. Returns `None` for notifications.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if req.is_notification() {
            tracing::debug!(method = %req.method, "Received notification");
            return None;
        }

        tracing::debug!(method = %req.method, "Received request");
        let id = req.id;
        let response = match req.method.as_str() {
            "initialize" => self.initialize(id, &req.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.tools_list(id),
            "tools/call" => self.tools_call(id, &req.params).await,
            "resources/list" => JsonRpcResponse::success(id, resources::list()),
            "resources/read" => self.resources_read(id, &req.params),
            "prompts/list" => JsonRpcResponse::success(id, prompts::list()),
            "prompts/get" => prompts_get(id, &req.params),
            other => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(response)
    }

    fn initialize(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        tracing::info!(protocol_version, "MCP initialize");

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": self.info.server_name,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<McpToolInfo> = self
            .tools
            .iter()
            .map(|t| McpToolInfo {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn tools_call(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
        };
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Tool not found: {name}"),
            );
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        tracing::info!(tool = name, "Executing tool");

        let (text, is_error) = match tool.execute(&self.ctx, arguments).await {
            Ok(response) => (pretty(&response.body), false),
            Err(e) => {
                tracing::warn!(tool = name, kind = %e.kind(), error = %e, "Tool execution failed");
                (pretty(&e.to_json()), true)
            }
        };

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text }],
                "isError": is_error
            }),
        )
    }

    fn resources_read(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(uri) = params.get("uri").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'uri' parameter");
        };
        match resources::read(uri, &self.info) {
            Some(body) => JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": pretty(&body)
                    }]
                }),
            ),
            None => JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Unknown resource: {uri}"),
            ),
        }
    }
}

impl std::fmt::Debug for McpHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpHandler")
            .field("tools", &self.tools.len())
            .field("server_name", &self.info.server_name)
            .finish()
    }
}

fn prompts_get(id: Option<Value>, params: &Value) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
    };
    let arguments =
        params.get("arguments").and_then(Value::as_object).cloned().unwrap_or_else(Map::new);
    match prompts::get(name, &arguments) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(message) => JsonRpcResponse::error(id, codes::INVALID_PARAMS, message),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
