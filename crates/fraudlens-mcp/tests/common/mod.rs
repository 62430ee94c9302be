//! Local stand-in for the API Gateway.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use fraudlens_core::McpConfig;
use fraudlens_mcp::{GatewayClient, JsonRpcRequest, McpServer};
use serde_json::{Value, json};

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
}

#[derive(Default)]
struct StubState {
    replies: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct StubGateway {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubGateway {
    /// Serve `replies` (path, status, body). Unlisted paths answer 404.
    pub async fn start(replies: Vec<(&str, u16, Value)>) -> Self {
        Self::start_raw(
            replies
                .into_iter()
                .map(|(path, status, body)| (path, status, body.to_string()))
                .collect(),
        )
        .await
    }

    pub async fn start_raw(replies: Vec<(&str, u16, String)>) -> Self {
        let state = Arc::new(StubState {
            replies: replies
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body)))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(reply).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn client(&self, api_key: Option<&str>) -> GatewayClient {
        GatewayClient::new(
            self.base_url.clone(),
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    pub fn merchant_server(&self) -> McpServer {
        McpServer::merchant(McpConfig::default(), self.client(None)).unwrap()
    }

    pub fn transaction_server(&self) -> McpServer {
        McpServer::transaction(McpConfig::default(), self.client(None)).unwrap()
    }
}

async fn reply(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        query,
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match state.replies.get(&path) {
        Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()),
        None => (
            StatusCode::NOT_FOUND,
            json!({"message": "Not Found"}).to_string(),
        ),
    }
}

/// Call `tool` and return the decoded result payload plus `isError`.
pub async fn call_tool(server: &McpServer, tool: &str, arguments: Value) -> (Value, bool) {
    let request = JsonRpcRequest::new(
        1,
        "tools/call",
        Some(json!({"name": tool, "arguments": arguments})),
    );
    let response = server.handle_request(request).await.unwrap();
    let result = response.result.expect("tools/call result");
    let text = result["content"][0]["text"].as_str().unwrap().to_string();
    let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (payload, result["isError"].as_bool().unwrap())
}
