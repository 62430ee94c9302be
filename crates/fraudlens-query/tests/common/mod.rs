//! Spy executor shared by the router integration tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use fraudlens_query::{ExecutorError, QueryExecutor, RowSet, SqlParam};
use serde_json::Value;

/// Records every statement and replays queued results in order.
///
/// Once the queue is empty every statement returns an empty row set.
#[derive(Debug, Default)]
pub struct SpyExecutor {
    pub calls: Vec<(String, Vec<SqlParam>)>,
    responses: VecDeque<Result<RowSet, ExecutorError>>,
}

#[allow(dead_code)]
impl SpyExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.responses.push_back(Ok(RowSet::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        )));
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.responses
            .push_back(Err(ExecutorError::Driver(message.to_string())));
        self
    }

    pub fn sql(&self, idx: usize) -> &str {
        &self.calls[idx].0
    }

    pub fn params(&self, idx: usize) -> &[SqlParam] {
        &self.calls[idx].1
    }
}

#[async_trait]
impl QueryExecutor for SpyExecutor {
    async fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<RowSet, ExecutorError> {
        self.calls.push((sql.to_string(), params.to_vec()));
        self.responses.pop_front().unwrap_or_else(|| Ok(RowSet::default()))
    }
}
