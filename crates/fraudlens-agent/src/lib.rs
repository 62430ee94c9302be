//! # fraudlens-agent
//!
//! Dispatch of Bedrock action-group events to the investigation agent.
//!
//! An event names an action group through `apiPath`. The group decides the
//! system prompt and which MCP tool servers the agent may call; the question
//! itself comes from the `query` input. The agent is a black box behind
//! [`AgentBackend`], and its text reply is wrapped in the action-group
//! response envelope.
//!
//! ```text
//! Bedrock agent ──event──▶ Dispatcher ──AgentRequest──▶ AgentBackend
//!                              │                            │
//!                              ◀────────── text ────────────┘
//!                              │
//!                              ▼
//!                   ActionGroupResponse (messageVersion 1.0)
//! ```

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod groups;

pub use backend::{AgentBackend, AgentRequest, HttpAgentBackend};
pub use dispatch::Dispatcher;
pub use error::AgentError;
pub use event::{ActionGroupEvent, ActionGroupResponse, Property};
pub use groups::{ActionGroup, Endpoint, EndpointTransport};
