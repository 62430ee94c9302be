//! Error types for query routing.
//!
//! [`QueryError`] is what callers see; its three variants map one-to-one to
//! HTTP 400, 404 and 500. [`ExecutorError`] is what an executor reports and is
//! always folded into [`QueryError::Database`] by the router.

use serde_json::{Value, json};

/// Tagged failure of a routed query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),

    /// A single-entity lookup matched zero rows.
    #[error("{0}")]
    NotFound(String),

    /// Executor failure; carries the driver message.
    #[error("{0}")]
    Database(String),
}

impl QueryError {
    // =========================================================================
    // VALIDATION ERRORS
    // =========================================================================

    /// A required parameter is absent or empty.
    pub fn missing_parameter(name: &str) -> Self {
        Self::Validation(format!("{} parameter is required", name))
    }

    /// An integer parameter did not parse or fell outside its range.
    pub fn invalid_integer(name: &str, expectation: &str) -> Self {
        Self::Validation(format!("{} must be {}", name, expectation))
    }

    pub fn missing_field_and_value() -> Self {
        Self::Validation("field and value parameters are required".to_string())
    }

    pub fn invalid_metric_type(allowed: &[&str]) -> Self {
        Self::Validation(format!(
            "Invalid metric type. Allowed values: {}",
            allowed.join(", ")
        ))
    }

    pub fn no_metric_columns(metric_type: &str) -> Self {
        Self::Validation(format!("No columns found for metric type: {}", metric_type))
    }

    pub fn invalid_table(table: &str) -> Self {
        Self::Validation(format!("Invalid table name: {}", table))
    }

    pub fn invalid_transaction_field(table: &str, allowed: &[&str]) -> Self {
        Self::Validation(format!(
            "Invalid field name for {}. Allowed fields: {}",
            table,
            allowed.join(", ")
        ))
    }

    pub fn invalid_merchant_field(allowed: &[&str]) -> Self {
        Self::Validation(format!(
            "Invalid field name. Allowed fields: {}",
            allowed.join(", ")
        ))
    }

    pub fn invalid_filter_format() -> Self {
        Self::Validation("Invalid filter format".to_string())
    }

    // =========================================================================
    // NOT FOUND ERRORS
    // =========================================================================

    pub fn merchant_not_found(merchant_number: &str) -> Self {
        Self::NotFound(format!("Merchant {} not found", merchant_number))
    }

    pub fn stats_not_found(merchant_number: &str, stat_date: &str) -> Self {
        Self::NotFound(format!(
            "Stats not found for merchant {} on date {}",
            merchant_number, stat_date
        ))
    }

    pub fn period_stats_not_found(merchant_number: &str, period: &str) -> Self {
        Self::NotFound(format!(
            "Stats not found for merchant {} with period {}",
            merchant_number, period
        ))
    }

    pub fn transaction_not_found(id: i64) -> Self {
        Self::NotFound(format!("Transaction {} not found", id))
    }

    pub fn no_transactions_for_merchant(merchant_number: &str) -> Self {
        Self::NotFound(format!(
            "No transactions found for merchant {}",
            merchant_number
        ))
    }

    pub fn no_transactions_matching(field: &str, value: &str) -> Self {
        Self::NotFound(format!("No transactions found with {}={}", field, value))
    }

    // =========================================================================
    // RESPONSE MAPPING
    // =========================================================================

    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::Validation(_) => 400,
            QueryError::NotFound(_) => 404,
            QueryError::Database(_) => 500,
        }
    }

    /// `{"error": message}` response body.
    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<ExecutorError> for QueryError {
    fn from(err: ExecutorError) -> Self {
        QueryError::Database(format!("Database error: {}", err))
    }
}

/// Failure reported by a [`crate::QueryExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// The driver rejected or failed the statement.
    #[error("{0}")]
    Driver(String),

    /// A returned value could not be converted to JSON.
    #[error("cannot decode column {column}: {message}")]
    Decode { column: String, message: String },
}
