//! # fraudlens-lambda
//!
//! Lambda glue for the fraudlens services. Two binaries live here:
//!
//! - `query-data`: API Gateway proxy events to the [`QueryRouter`], one
//!   Postgres connection per invocation.
//! - `agent-dispatch`: Bedrock action-group events to the agent
//!   [`Dispatcher`](fraudlens_agent::Dispatcher).
//!
//! Handlers take plain `serde_json` events so they can be driven from tests
//! without the runtime.
//!
//! [`QueryRouter`]: fraudlens_query::QueryRouter

use std::path::PathBuf;

use fraudlens_core::{ConfigError, FraudlensConfig};

pub mod proxy;
pub mod query_data;

pub use proxy::{ProxyRequest, ProxyResponse};
pub use query_data::{ConnectionSource, PgConnectionSource, QueryDataHandler};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "FRAUDLENS_CONFIG";

/// Load the config named by [`CONFIG_PATH_ENV`], or defaults when unset.
pub fn load_config() -> Result<FraudlensConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    FraudlensConfig::load(path.as_deref())
}

/// Plain-text tracing for CloudWatch: no colours, no timestamps.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();
}
