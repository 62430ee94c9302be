//! Agent dispatch configuration.
//!
//! Host names for the MCP endpoints follow the container deployment: each
//! tool server sits behind its own load balancer whose DNS name is injected
//! through the environment.

use serde::{Deserialize, Serialize};

use super::resolve_env;

/// Settings for forwarding action-group queries to the agent backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    #[serde(default = "default_model_id_env")]
    pub model_id_env: String,

    /// URL the agent backend accepts requests on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_url: Option<String>,

    #[serde(default = "default_runtime_url_env")]
    pub runtime_url_env: String,

    /// Merchant MCP server host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_host: Option<String>,

    #[serde(default = "default_merchant_host_env")]
    pub merchant_host_env: String,

    /// Transaction MCP server host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_host: Option<String>,

    #[serde(default = "default_transaction_host_env")]
    pub transaction_host_env: String,

    /// Web search MCP server host (SSE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_host: Option<String>,

    #[serde(default = "default_search_host_env")]
    pub search_host_env: String,

    /// Page fetch MCP server host (SSE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_host: Option<String>,

    #[serde(default = "default_fetch_host_env")]
    pub fetch_host_env: String,

    /// Path of the streamable-HTTP MCP route on the merchant/transaction hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_path: Option<String>,

    #[serde(default = "default_mcp_path_env")]
    pub mcp_path_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model_id: None,
            model_id_env: default_model_id_env(),
            runtime_url: None,
            runtime_url_env: default_runtime_url_env(),
            merchant_host: None,
            merchant_host_env: default_merchant_host_env(),
            transaction_host: None,
            transaction_host_env: default_transaction_host_env(),
            search_host: None,
            search_host_env: default_search_host_env(),
            fetch_host: None,
            fetch_host_env: default_fetch_host_env(),
            mcp_path: None,
            mcp_path_env: default_mcp_path_env(),
            temperature: default_temperature(),
        }
    }
}

impl AgentConfig {
    pub fn resolved_model_id(&self) -> Option<String> {
        resolve_env(Some(&self.model_id_env), self.model_id.as_deref())
    }

    pub fn resolved_runtime_url(&self) -> Option<String> {
        resolve_env(Some(&self.runtime_url_env), self.runtime_url.as_deref())
    }

    pub fn resolved_merchant_host(&self) -> String {
        resolve_env(Some(&self.merchant_host_env), self.merchant_host.as_deref())
            .unwrap_or_default()
    }

    pub fn resolved_transaction_host(&self) -> String {
        resolve_env(Some(&self.transaction_host_env), self.transaction_host.as_deref())
            .unwrap_or_default()
    }

    pub fn resolved_search_host(&self) -> String {
        resolve_env(Some(&self.search_host_env), self.search_host.as_deref()).unwrap_or_default()
    }

    pub fn resolved_fetch_host(&self) -> String {
        resolve_env(Some(&self.fetch_host_env), self.fetch_host.as_deref()).unwrap_or_default()
    }

    /// MCP route on the tool-server hosts, defaulting to `/mcp`.
    pub fn resolved_mcp_path(&self) -> String {
        resolve_env(Some(&self.mcp_path_env), self.mcp_path.as_deref())
            .unwrap_or_else(|| "/mcp".to_string())
    }
}

fn default_model_id_env() -> String {
    "AGENT_MODEL".to_string()
}

fn default_runtime_url_env() -> String {
    "AGENT_RUNTIME_URL".to_string()
}

fn default_merchant_host_env() -> String {
    "MERCH_ALB_DNS".to_string()
}

fn default_transaction_host_env() -> String {
    "TRANS_ALB_DNS".to_string()
}

fn default_search_host_env() -> String {
    "SEARCH_ALB_DNS".to_string()
}

fn default_fetch_host_env() -> String {
    "FETCH_ALB_DNS".to_string()
}

fn default_mcp_path_env() -> String {
    "MCP_PATH".to_string()
}

fn default_temperature() -> f32 {
    0.3
}
