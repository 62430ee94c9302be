//! # fraudlens-mcp
//!
//! MCP (Model Context Protocol) tool servers for fraud investigation.
//!
//! Two tool sets share one server implementation:
//!
//! - **Merchant tools**: profile lookup, statistics, metric filtering, search,
//!   chargeback and refund summaries, decline analysis.
//! - **Transaction tools**: authorization/settlement lookup by id, per-merchant
//!   listing, recent transactions, single-field filtering.
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────────┐
//! │  Fraudlens MCP Server│
//! │  1. Validate args    │  ← JSON schema per tool
//! │  2. Build query      │
//! │  3. GET API Gateway  │  ← x-api-key when configured
//! │  4. Reshape reply    │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     query-data Lambda
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use fraudlens_core::FraudlensConfig;
//! use fraudlens_mcp::{GatewayClient, McpServer};
//!
//! let config = FraudlensConfig::load(None)?;
//! let gateway = GatewayClient::from_config(&config.gateway)?;
//! McpServer::merchant(config.mcp, gateway)?.run().await?;
//! ```

pub mod error;
pub mod gateway;
pub mod http_transport;
pub mod merchant;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transaction;

pub use error::{GatewayError, McpError};
pub use gateway::{GatewayClient, QueryArgs};
pub use merchant::{MerchantTools, StatPeriod, normalize_stat_date};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolContent,
    ToolDefinition,
};
pub use server::McpServer;
pub use tools::{Arguments, ToolRegistry, ToolSet};
pub use transaction::{TransactionKind, TransactionTools};
