//! The query-data handler.
//!
//! Each invocation resolves the resource, takes one connection from a
//! [`ConnectionSource`], routes the query and hands the connection back
//! before the response is built.

use async_trait::async_trait;
use fraudlens_adapter_pg::PgQueryExecutor;
use fraudlens_core::UpstreamConfig;
use fraudlens_query::{QueryExecutor, QueryRouter, ResourcePath};
use serde_json::json;

use crate::proxy::{ProxyRequest, ProxyResponse};

/// Opens and closes per-invocation connections.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    type Conn: QueryExecutor;

    async fn acquire(&self) -> anyhow::Result<Self::Conn>;

    /// Close `conn`. Failures are logged, never surfaced.
    async fn release(&self, conn: Self::Conn);
}

/// Fresh Postgres connection per invocation.
#[derive(Debug, Clone)]
pub struct PgConnectionSource {
    upstream: UpstreamConfig,
}

impl PgConnectionSource {
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl ConnectionSource for PgConnectionSource {
    type Conn = PgQueryExecutor;

    async fn acquire(&self) -> anyhow::Result<PgQueryExecutor> {
        Ok(PgQueryExecutor::connect(&self.upstream).await?)
    }

    async fn release(&self, conn: PgQueryExecutor) {
        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "Closing connection failed");
        }
    }
}

pub struct QueryDataHandler<S> {
    router: QueryRouter,
    source: S,
}

impl<S: ConnectionSource> QueryDataHandler<S> {
    pub fn new(router: QueryRouter, source: S) -> Self {
        Self { router, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn handle(&self, request: &ProxyRequest) -> ProxyResponse {
        let path = request.path.to_lowercase();
        tracing::info!(path = %path, method = ?request.http_method, "Received request");

        let resource = match path.parse::<ResourcePath>() {
            Ok(resource) => resource,
            Err(err) => {
                tracing::warn!(path = %path, "Unknown path");
                return ProxyResponse::json(404, &json!({ "error": err.to_string() }));
            }
        };
        let params = request.parameters();

        let mut conn = match self.source.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(error = %err, "Cannot open database connection");
                return ProxyResponse::json(
                    500,
                    &json!({ "error": format!("Internal server error: {}", err) }),
                );
            }
        };

        let result = self.router.route(&mut conn, resource, &params).await;
        self.source.release(conn).await;

        match result {
            Ok(outcome) => ProxyResponse::json(200, &outcome.to_body()),
            Err(err) => ProxyResponse::json(err.status_code(), &err.to_body()),
        }
    }
}
