//! Successful query results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One database row, keyed by lower-cased column name in select order.
pub type Row = Map<String, Value>;

/// Paging metadata for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub pages: u64,
}

impl Pagination {
    /// `pages` is `ceil(total / page_size)`.
    pub fn new(total: u64, page: u32, page_size: u32) -> Self {
        let pages = total.div_ceil(u64::from(page_size.max(1)));
        Self {
            total,
            page,
            page_size,
            pages,
        }
    }
}

/// What a routed query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// A single row (or a single projected field).
    Item(Row),
    /// One page of search results.
    Page {
        items: Vec<Row>,
        pagination: Pagination,
    },
    /// A list of rows; `count` is reported by the filter operation only.
    Items {
        items: Vec<Row>,
        count: Option<usize>,
    },
}

impl QueryOutcome {
    /// Response body in the shape the API Gateway clients expect.
    ///
    /// - `Item` → `{"item": row}`
    /// - `Page` → `{"item": {"merchants": [...], "pagination": {...}}}`
    /// - `Items` → `{"items": [...]}` plus `"count"` when present
    pub fn to_body(&self) -> Value {
        match self {
            QueryOutcome::Item(row) => json!({ "item": row }),
            QueryOutcome::Page { items, pagination } => json!({
                "item": {
                    "merchants": items,
                    "pagination": pagination,
                }
            }),
            QueryOutcome::Items { items, count } => {
                let mut body = json!({ "items": items });
                if let Some(count) = count {
                    body["count"] = json!(count);
                }
                body
            }
        }
    }

    pub fn item(&self) -> Option<&Row> {
        match self {
            QueryOutcome::Item(row) => Some(row),
            _ => None,
        }
    }

    /// Rows of a list or page outcome.
    pub fn items(&self) -> &[Row] {
        match self {
            QueryOutcome::Item(_) => &[],
            QueryOutcome::Page { items, .. } | QueryOutcome::Items { items, .. } => items,
        }
    }
}
