//! The agent backend seam.
//!
//! Model selection, prompting and tool use happen behind [`AgentBackend`].
//! The shipped [`HttpAgentBackend`] hands each request to an agent runtime
//! service over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use fraudlens_core::AgentConfig;
use serde::Serialize;
use serde_json::Value;

use crate::error::AgentError;
use crate::groups::Endpoint;

/// Everything the backend needs to answer one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRequest {
    pub model_id: Option<String>,
    pub system_prompt: String,
    pub query: String,
    pub endpoints: Vec<Endpoint>,
    pub temperature: f32,
}

#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Run the agent and return its text reply.
    async fn invoke(&self, request: &AgentRequest) -> Result<String, AgentError>;
}

/// Agent runtime reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAgentBackend {
    http: reqwest::Client,
    url: String,
}

impl HttpAgentBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_config(config: &AgentConfig, timeout: Duration) -> Result<Self, AgentError> {
        let url = config.resolved_runtime_url().ok_or_else(|| {
            AgentError::Config(format!(
                "{} environment variable not set",
                config.runtime_url_env
            ))
        })?;
        Self::new(url, timeout)
    }
}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn invoke(&self, request: &AgentRequest) -> Result<String, AgentError> {
        tracing::debug!(url = %self.url, endpoints = request.endpoints.len(), "Invoking agent runtime");

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::Backend(format!("agent runtime unreachable: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::Backend(format!("cannot read agent reply: {}", e)))?;

        if !status.is_success() {
            return Err(AgentError::Backend(format!(
                "agent runtime returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        Ok(match serde_json::from_str::<Value>(&text) {
            Ok(reply) => reply_text(&reply),
            Err(_) => text,
        })
    }
}

/// Text of an agent reply: `text`, else `content`, else `message`, else the
/// reply itself. Content-block lists are flattened to their text parts.
pub fn reply_text(reply: &Value) -> String {
    ["text", "content", "message"]
        .iter()
        .find_map(|key| reply.get(*key).filter(|v| !v.is_null()))
        .map(flatten)
        .unwrap_or_else(|| flatten(reply))
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .map(|block| match block.get("text") {
                Some(Value::String(t)) => t.clone(),
                _ => flatten(block),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) if has_text(value, "text") || has_text(value, "content") => {
            reply_text(value)
        }
        other => other.to_string(),
    }
}

fn has_text(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}
