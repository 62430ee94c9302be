//! Shared configuration types for the fraudlens services.
//!
//! Every binary in the workspace (query-data Lambda, agent dispatch Lambda,
//! MCP tool servers, CLI) reads a [`FraudlensConfig`], either from a YAML file
//! or from defaults plus environment indirection.

// Configuration types shared across all fraudlens crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    AgentConfig, ConfigError, FraudlensConfig, GatewayConfig, McpConfig, RouterConfig, SslMode,
    Transport, UpstreamConfig,
};
