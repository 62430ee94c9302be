//! Query router limits.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Row caps and paging defaults passed explicitly into the query router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Upper bound on rows returned by filter and range queries.
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,

    /// Page size used when a search omits `page_size`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest `page_size` a search may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rows == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Config(
                "router.max_rows and router.max_page_size must be greater than zero".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Config(format!(
                "router.default_page_size must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(())
    }
}

fn default_max_rows() -> u32 {
    100
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}
