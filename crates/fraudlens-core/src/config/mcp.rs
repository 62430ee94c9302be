//! MCP server configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an MCP tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Transport type: "stdio" or "http".
    #[serde(default)]
    pub transport: Transport,

    /// HTTP bind host (only used when transport is HTTP).
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP port (only used when transport is HTTP).
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Route that accepts JSON-RPC POSTs.
    #[serde(default = "default_path")]
    pub path: String,

    /// File served for the `file://README.md` resource.
    #[serde(default = "default_readme_path")]
    pub readme_path: PathBuf,
}

/// MCP transport type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Standard input/output transport.
    Stdio,
    /// HTTP transport (the container deployment).
    #[default]
    Http,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_http_host(),
            port: default_http_port(),
            path: default_path(),
            readme_path: default_readme_path(),
        }
    }
}

impl McpConfig {
    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_http(&self) -> bool {
        self.transport == Transport::Http
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/mcp".to_string()
}

fn default_readme_path() -> PathBuf {
    PathBuf::from("/app/README.md")
}
