//! HTTP client for the API Gateway fronting the query-data Lambda.
//!
//! Every tool call turns into exactly one `GET {base_url}{path}?<args>`.
//! Non-2xx replies become a [`GatewayError`] whose message is dug out of the
//! reply body; transport failures become a 503.

use std::time::Duration;

use fraudlens_core::GatewayConfig;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::{GatewayError, McpError};

/// Query-string arguments. Absent optionals are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs(Vec<(&'static str, String)>);

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, name: &'static str, value: impl ToString) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    pub fn opt<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.arg(name, v),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Shared API Gateway client.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, McpError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::StartupFailed(format!("cannot build HTTP client: {}", e)))?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build from config; the base URL is mandatory.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, McpError> {
        let base_url = config.resolved_base_url().ok_or_else(|| {
            McpError::Config(format!(
                "{} environment variable not set",
                config.base_url_env
            ))
        })?;
        Self::new(
            base_url,
            config.resolved_api_key(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `args` as the query string and return the JSON reply.
    pub async fn get(&self, path: &str, args: &QueryArgs) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!(%url, "Calling API Gateway");

        let mut request = self
            .http
            .get(&url)
            .query(args.pairs())
            .header(CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Network error calling API Gateway");
            GatewayError::network(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(GatewayError::network)?;
        tracing::debug!(%url, status = status.as_u16(), "API Gateway response");

        if !status.is_success() {
            let message = error_message(&text);
            tracing::warn!(%url, status = status.as_u16(), %message, "API Gateway call failed");
            return Err(GatewayError::new(status.as_u16(), message));
        }

        serde_json::from_str(&text)
            .map_err(|e| GatewayError::new(502, format!("Invalid JSON from API Gateway: {}", e)))
    }
}

/// Error text of a failed reply.
///
/// Precedence: `error` inside a stringified `body`, then `message`, then
/// `error`. Bodies that are not a JSON object come back verbatim.
pub fn error_message(text: &str) -> String {
    const UNKNOWN: &str = "Unknown error";

    let Ok(Value::Object(reply)) = serde_json::from_str::<Value>(text) else {
        return text.to_string();
    };

    if let Some(Value::String(body)) = reply.get("body") {
        return match serde_json::from_str::<Value>(body) {
            Ok(inner) => inner
                .get("error")
                .map(value_text)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            Err(_) => text.to_string(),
        };
    }

    reply
        .get("message")
        .or_else(|| reply.get("error"))
        .map(value_text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
