//! The executor seam between routing and the database driver.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecutorError;
use crate::outcome::Row;

/// A bound query value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl SqlParam {
    pub fn text(value: impl Into<String>) -> Self {
        SqlParam::Text(value.into())
    }
}

/// Columns and rows returned by one statement.
///
/// `columns` is filled even when `rows` is empty, so a `LIMIT 0` select
/// reports a table's live column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Column names, lower-cased.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_lowercase()).collect()
    }

    /// Rows as maps keyed by lower-cased column name.
    pub fn into_rows(self) -> Vec<Row> {
        let columns = self.column_names();
        self.rows
            .into_iter()
            .map(|values| columns.iter().cloned().zip(values).collect())
            .collect()
    }

    /// The first row, if any.
    pub fn into_first_row(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs one SQL statement with positional (`$1`, `$2`, ...) parameters.
///
/// Implementations must not retry. One executor serves one request.
#[async_trait]
pub trait QueryExecutor: Send {
    async fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<RowSet, ExecutorError>;
}
