//! API Gateway client configuration for the MCP tool servers.

use serde::{Deserialize, Serialize};

use super::resolve_env;

/// Where the MCP tools send their HTTP GETs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL, e.g. `https://abc.execute-api.us-east-1.amazonaws.com/prod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the base URL. Wins over `base_url`.
    #[serde(default = "default_base_url_env")]
    pub base_url_env: String,

    /// API key sent as `x-api-key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_url_env: default_base_url_env(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl GatewayConfig {
    /// Resolved base URL without a trailing slash.
    pub fn resolved_base_url(&self) -> Option<String> {
        resolve_env(Some(&self.base_url_env), self.base_url.as_deref())
            .map(|url| url.trim_end_matches('/').to_string())
    }

    /// Resolved API key, if any is configured.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_env(Some(&self.api_key_env), self.api_key.as_deref())
    }
}

fn default_base_url_env() -> String {
    "API_GATEWAY_BASE_URL".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}
