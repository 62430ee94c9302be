//! Error types for action-group dispatch.

use serde_json::{Value, json};

/// Failure of a dispatched action-group call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// `apiPath` names no known action group.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The event carried no non-empty `query`.
    #[error("Query parameter is required")]
    MissingQuery,

    /// Required backend configuration is absent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The agent backend failed or answered with something unusable.
    #[error("{0}")]
    Backend(String),
}

impl AgentError {
    /// HTTP status written into the action-group response.
    pub fn status_code(&self) -> u16 {
        match self {
            AgentError::UnknownOperation(_) | AgentError::MissingQuery => 400,
            AgentError::Config(_) | AgentError::Backend(_) => 500,
        }
    }

    /// `{"error": ...}`. Server-side failures carry the
    /// `Internal server error:` prefix.
    pub fn to_body(&self) -> Value {
        match self.status_code() {
            500 => json!({ "error": format!("Internal server error: {}", self) }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}
