//! MCP server implementation.
//!
//! One [`McpServer`] serves one [`ToolSet`]. Requests are independent of each
//! other; all shared state (registry, tool set, gateway client) is immutable
//! and reference counted, so the server is cheap to clone into request tasks.

use std::sync::Arc;

use fraudlens_core::{McpConfig, Transport};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use crate::error::McpError;
use crate::gateway::GatewayClient;
use crate::http_transport::{HttpServer, RequestSender};
use crate::merchant::MerchantTools;
use crate::protocol::*;
use crate::tools::{Arguments, ToolRegistry, ToolSet};
use crate::transaction::TransactionTools;

/// URI of the single documentation resource.
pub const README_URI: &str = "file://README.md";

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: Arc<ToolRegistry>,
    tool_set: Arc<dyn ToolSet>,
    gateway: GatewayClient,
}

impl McpServer {
    /// Create a server exposing every tool of `tool_set`.
    pub fn new(
        config: McpConfig,
        tool_set: Arc<dyn ToolSet>,
        gateway: GatewayClient,
    ) -> Result<Self, McpError> {
        let tools = ToolRegistry::from_set(tool_set.as_ref())?;
        tracing::info!(
            server = tool_set.server_name(),
            tool_count = tools.len(),
            "Registered tools"
        );
        Ok(Self {
            config,
            tools: Arc::new(tools),
            tool_set,
            gateway,
        })
    }

    pub fn merchant(config: McpConfig, gateway: GatewayClient) -> Result<Self, McpError> {
        Self::new(config, Arc::new(MerchantTools), gateway)
    }

    pub fn transaction(config: McpConfig, gateway: GatewayClient) -> Result<Self, McpError> {
        Self::new(config, Arc::new(TransactionTools), gateway)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &McpConfig {
        &self.config
    }

    /// Start the MCP server.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(server = self.tool_set.server_name(), "Starting MCP server with stdio transport");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                )),
            };

            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        tracing::info!(
            server = self.tool_set.server_name(),
            addr = %self.config.bind_addr(),
            path = %self.config.path,
            "Starting MCP server with HTTP transport"
        );

        let http_server = HttpServer::new(
            self.config.bind_addr(),
            self.config.path.clone(),
            self.spawn_dispatcher(),
        );
        http_server.run().await
    }

    /// Spawn the task that answers requests arriving from the HTTP transport.
    /// Each request runs on its own task.
    pub fn spawn_dispatcher(&self) -> RequestSender {
        let (request_tx, mut request_rx) =
            mpsc::channel::<(JsonRpcRequest, oneshot::Sender<Option<JsonRpcResponse>>)>(100);

        let server = self.clone();
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let server = server.clone();
                tokio::spawn(async move {
                    let response = server.handle_request(request).await;
                    let _ = response_tx.send(response);
                });
            }
        });

        request_tx
    }

    /// Handle a JSON-RPC request. Notifications produce no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "resources/list" => self.handle_list_resources(id),
            "resources/read" => self.handle_read_resource(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.tool_set.server_name(),
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools.list() }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Tool not found: {}", params.name),
            );
        }

        let arguments = match params.arguments {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(args) => args,
        };

        let result = match self.tools.validate(&params.name, &arguments) {
            Some(Err(errors)) => {
                tracing::warn!(tool = %params.name, ?errors, "Rejected tool arguments");
                CallToolResponse::error_text(format!(
                    "Invalid arguments for {}: {}",
                    params.name,
                    errors.join("; ")
                ))
            }
            _ => match arguments {
                Value::Object(map) => {
                    tracing::info!(tool = %params.name, "MCP tool call");
                    let value = self
                        .tool_set
                        .call(&self.gateway, &params.name, &Arguments::new(map))
                        .await;
                    let is_error = value.get("error").is_some();
                    if is_error {
                        tracing::warn!(tool = %params.name, result = %value, "Tool returned an error");
                    } else {
                        tracing::debug!(tool = %params.name, "Tool succeeded");
                    }
                    CallToolResponse::json(&value, is_error)
                }
                _ => CallToolResponse::error_text(format!(
                    "Invalid arguments for {}: arguments must be an object",
                    params.name
                )),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    fn handle_list_resources(&self, id: Option<Value>) -> JsonRpcResponse {
        let readme = ResourceDefinition {
            uri: README_URI.to_string(),
            name: "README.md".to_string(),
            description: Some("Tool structure and API usage".to_string()),
            mime_type: "text/markdown".to_string(),
        };
        JsonRpcResponse::success(id, json!({ "resources": [readme] }))
    }

    async fn handle_read_resource(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ReadResourceParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e));
            }
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        if params.uri != README_URI {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Resource not found: {}", params.uri),
            );
        }

        let path = &self.config.readme_path;
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read README resource");
                format!("Cannot read {}: {}", path.display(), e)
            }
        };

        let contents = ResourceContents {
            uri: README_URI.to_string(),
            mime_type: "text/markdown".to_string(),
            text,
        };
        JsonRpcResponse::success(id, json!({ "contents": [contents] }))
    }
}
