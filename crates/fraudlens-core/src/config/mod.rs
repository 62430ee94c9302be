//! Configuration types for fraudlens.
//!
//! A single `fraudlens.yaml` file carries every section; each section can also
//! be left out entirely, in which case defaults plus environment variables are
//! used. This is how the Lambda binaries run: no file, only environment.
//!
//! # Sections
//!
//! - **upstream**: Postgres connection used by the query-data Lambda
//! - **gateway**: API Gateway base URL and API key used by the MCP tool servers
//! - **mcp**: MCP transport settings
//! - **agent**: agent backend and MCP endpoint hosts used by agent dispatch
//! - **router**: row caps and paging defaults for the query router

pub mod agent;
pub mod gateway;
pub mod mcp;
pub mod router;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use agent::AgentConfig;
pub use gateway::GatewayConfig;
pub use mcp::{McpConfig, Transport};
pub use router::RouterConfig;
pub use upstream::{SslMode, UpstreamConfig};

/// Complete fraudlens configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FraudlensConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// API Gateway client settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// MCP server configuration.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Agent dispatch configuration.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Query router limits.
    #[serde(default)]
    pub router: RouterConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FraudlensConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;
        if self.gateway.timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "gateway.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if !self.mcp.path.starts_with('/') {
            return Err(ConfigError::Config(format!(
                "mcp.path must start with '/': {}",
                self.mcp.path
            )));
        }
        Ok(())
    }
}

/// Resolve a value that may be given directly or through an environment
/// variable. The environment wins when the variable is set and non-empty.
pub(crate) fn resolve_env(env_var: Option<&str>, direct: Option<&str>) -> Option<String> {
    if let Some(var) = env_var
        && let Ok(value) = std::env::var(var)
        && !value.is_empty()
    {
        return Some(value);
    }
    direct.map(str::to_string)
}
