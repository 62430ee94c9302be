//! Upstream database configuration.
//!
//! The query-data Lambda opens one connection per invocation, so there is no
//! pool section here. Connection parameters come from one of:
//! 1. `database_url_env` - an environment variable holding the full URL
//! 2. `database_url` - the URL itself
//! 3. Individual fields (host, port, database, username, password)

use serde::{Deserialize, Serialize};

use super::resolve_env;

/// Configuration for the upstream Postgres connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Environment variable name containing the PostgreSQL connection URL.
    /// Highest precedence.
    #[serde(default = "default_database_url_env", skip_serializing_if = "Option::is_none")]
    pub database_url_env: Option<String>,

    /// Full PostgreSQL connection URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// SSL mode, appended as `sslmode=` when the URL is built from fields.
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Seconds to wait for the connection to open.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            database_url_env: default_database_url_env(),
            database_url: None,
            host: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: None,
            password_env: None,
            ssl_mode: SslMode::default(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

/// SSL mode for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    #[serde(rename = "verify-ca")]
    VerifyCa,
    #[serde(rename = "verify-full")]
    VerifyFull,
}

impl SslMode {
    /// libpq spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl UpstreamConfig {
    /// Build a PostgreSQL connection string from this configuration.
    ///
    /// Precedence:
    /// 1. database_url_env (environment variable)
    /// 2. database_url (direct URL)
    /// 3. Individual fields
    pub fn connection_string(&self) -> String {
        if let Some(url) = resolve_env(self.database_url_env.as_deref(), self.database_url.as_deref())
        {
            return url;
        }

        let auth = match self.get_password() {
            Some(password) => format!("{}:{}", self.username, password),
            None => self.username.clone(),
        };
        format!(
            "postgresql://{}@{}:{}/{}?sslmode={}",
            auth,
            self.host,
            self.port,
            self.database,
            self.ssl_mode.as_str()
        )
    }

    fn get_password(&self) -> Option<String> {
        resolve_env(self.password_env.as_deref(), self.password.as_deref())
    }

    /// Check if this configuration uses environment variables.
    pub fn uses_env_credentials(&self) -> bool {
        self.database_url_env.is_some() || self.password_env.is_some()
    }
}

fn default_database_url_env() -> Option<String> {
    Some("DATABASE_URL".to_string())
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_username() -> String {
    "postgres".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}
