//! HTTP transport for MCP server.
//!
//! JSON-RPC requests are POSTed to the configured path (default `/mcp`) and
//! forwarded over a channel to the server's dispatcher task. `GET /health`
//! and `GET /healthz` answer load balancer health checks.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::McpError;
use crate::protocol::{INTERNAL_ERROR, JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};

/// Channel into the server's dispatcher. The reply is `None` for
/// notifications.
pub type RequestSender =
    mpsc::Sender<(JsonRpcRequest, oneshot::Sender<Option<JsonRpcResponse>>)>;

/// HTTP transport handler state.
pub struct HttpTransportState {
    request_tx: RequestSender,
}

impl HttpTransportState {
    pub fn new(request_tx: RequestSender) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>, path: &str) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = uuid::Uuid::new_v4();
            tracing::info_span!(
                "request",
                %request_id,
                method = %request.method(),
                path = %request.uri().path()
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(path, post(handle_mcp_post))
        .route("/health", get(handle_health))
        .route("/healthz", get(handle_healthz))
        .with_state(state)
        .layer(trace)
        .layer(CorsLayer::permissive())
}

/// Handle POST requests (JSON-RPC over HTTP).
async fn handle_mcp_post(State(state): State<Arc<HttpTransportState>>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                )),
            )
                .into_response();
        }
    };
    tracing::debug!(method = %request.method, "JSON-RPC request");

    let (response_tx, response_rx) = oneshot::channel();
    if state.request_tx.send((request, response_tx)).await.is_err() {
        return unavailable("MCP server unavailable");
    }

    match response_rx.await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(_) => unavailable("No response from MCP server"),
    }
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(JsonRpcResponse::error(None, INTERNAL_ERROR, message)),
    )
        .into_response()
}

async fn handle_health() -> &'static str {
    "OK"
}

async fn handle_healthz() -> &'static str {
    "ok"
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    path: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    pub fn new(addr: impl Into<String>, path: impl Into<String>, request_tx: RequestSender) -> Self {
        Self {
            addr: addr.into(),
            path: path.into(),
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Run the HTTP server until ctrl-c.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state, &self.path);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| McpError::StartupFailed(format!("Failed to bind to {}: {}", self.addr, e)))?;

        tracing::info!(addr = %self.addr, path = %self.path, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown signal received");
            })
            .await
            .map_err(|e| McpError::TransportError(e.to_string()))?;

        Ok(())
    }
}
