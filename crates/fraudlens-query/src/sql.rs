//! SELECT statement builder with positional parameters.
//!
//! Identifiers are `&'static str` so that only catalog constants can reach
//! the SQL text; every value goes through [`SelectBuilder::bind`].

use crate::executor::SqlParam;

/// Incrementally built `SELECT`.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: &'static str,
    projection: Vec<&'static str>,
    where_parts: Vec<String>,
    params: Vec<SqlParam>,
    order_by: Option<String>,
    limit: Option<u32>,
    page: Option<(i64, i64)>,
}

impl SelectBuilder {
    /// `SELECT * FROM table`.
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            projection: Vec::new(),
            where_parts: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
            page: None,
        }
    }

    /// Project exactly `columns` instead of `*`.
    pub fn columns(mut self, columns: impl IntoIterator<Item = &'static str>) -> Self {
        self.projection = columns.into_iter().collect();
        self
    }

    /// Add a parameter and return its `$n` index.
    pub fn bind(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// `column = $n`
    pub fn where_eq(mut self, column: &'static str, param: SqlParam) -> Self {
        let idx = self.bind(param);
        self.where_parts.push(format!("{} = ${}", column, idx));
        self
    }

    /// `CAST(column AS TEXT) = $n`
    pub fn where_text_eq(mut self, column: &'static str, value: &str) -> Self {
        let idx = self.bind(SqlParam::text(value));
        self.where_parts
            .push(format!("CAST({} AS TEXT) = ${}", column, idx));
        self
    }

    /// `column ILIKE $n` with the value wrapped in `%`.
    pub fn where_contains(mut self, column: &'static str, value: &str) -> Self {
        let idx = self.bind(SqlParam::text(format!("%{}%", value)));
        self.where_parts.push(format!("{} ILIKE ${}", column, idx));
        self
    }

    /// Date window on `column`: `BETWEEN`, `>=`, `<=` or nothing, depending on
    /// which bounds are present. Bounds are cast to `cast`.
    pub fn where_window(
        mut self,
        column: &'static str,
        cast: &'static str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Self {
        match (from, to) {
            (Some(from), Some(to)) => {
                let lo = self.bind(SqlParam::text(from));
                let hi = self.bind(SqlParam::text(to));
                self.where_parts.push(format!(
                    "{} BETWEEN ${}::{} AND ${}::{}",
                    column, lo, cast, hi, cast
                ));
            }
            (Some(from), None) => {
                let lo = self.bind(SqlParam::text(from));
                self.where_parts
                    .push(format!("{} >= ${}::{}", column, lo, cast));
            }
            (None, Some(to)) => {
                let hi = self.bind(SqlParam::text(to));
                self.where_parts
                    .push(format!("{} <= ${}::{}", column, hi, cast));
            }
            (None, None) => {}
        }
        self
    }

    /// `ORDER BY column DESC`, nulls last when asked.
    pub fn order_desc(mut self, column: &'static str, nulls_last: bool) -> Self {
        self.order_by = Some(if nulls_last {
            format!("{} DESC NULLS LAST", column)
        } else {
            format!("{} DESC", column)
        });
        self
    }

    pub fn order_asc(mut self, column: &'static str) -> Self {
        self.order_by = Some(column.to_string());
        self
    }

    /// Literal `LIMIT n`.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Bound `LIMIT $n OFFSET $m`, appended after the filter parameters.
    pub fn paginate(mut self, page_size: u32, offset: u64) -> Self {
        self.page = Some((
            i64::from(page_size),
            i64::try_from(offset).unwrap_or(i64::MAX),
        ));
        self
    }

    fn where_clause(&self) -> String {
        if self.where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_parts.join(" AND "))
        }
    }

    /// Statement text and parameters.
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let projection = if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection.join(", ")
        };
        let mut sql = format!(
            "SELECT {} FROM {}{}",
            projection,
            self.table,
            self.where_clause()
        );
        if let Some(order_by) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {}", order_by));
        }
        let mut params = self.params.clone();
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some((limit, offset)) = self.page {
            let n = params.len();
            sql.push_str(&format!(" LIMIT ${} OFFSET ${}", n + 1, n + 2));
            params.push(SqlParam::Int(limit));
            params.push(SqlParam::Int(offset));
        }
        (sql, params)
    }

    /// `SELECT COUNT(*) AS total` over the same predicate, without ordering
    /// or paging.
    pub fn build_count(&self) -> (String, Vec<SqlParam>) {
        (
            format!(
                "SELECT COUNT(*) AS total FROM {}{}",
                self.table,
                self.where_clause()
            ),
            self.params.clone(),
        )
    }
}
