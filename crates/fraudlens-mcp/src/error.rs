//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// A tool's input schema does not compile.
    #[error("invalid input schema for tool {tool}: {reason}")]
    InvalidSchema { tool: String, reason: String },

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failed call to the API Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API Gateway Error {status}: {message}")]
pub struct GatewayError {
    pub status: u16,
    pub message: String,
}

impl GatewayError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::new(503, format!("Network error calling API Gateway: {}", err))
    }
}
