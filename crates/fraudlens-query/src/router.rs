//! Resource routing and per-operation query construction.

use fraudlens_core::RouterConfig;
use serde_json::Value;

use crate::catalog::{
    self, ALL_METRICS, MERCHANT_DETAILS_TABLE, MERCHANT_FIELDS, MERCHANT_STATS_COLUMNS,
    MERCHANT_STATS_KEY_COLUMNS, MERCHANT_STATS_TABLE, TransactionTable,
};
use crate::error::{ExecutorError, QueryError};
use crate::executor::{QueryExecutor, RowSet, SqlParam};
use crate::outcome::{Pagination, QueryOutcome, Row};
use crate::params::ParameterSet;
use crate::resource::ResourcePath;
use crate::sql::SelectBuilder;

/// Period used when a stats filter omits `stat_date`.
const DEFAULT_PERIOD: &str = "Day";

/// Maps `(resource, parameters)` to SQL and runs it.
///
/// Stateless apart from its limits; one router can serve any number of
/// concurrent requests, each with its own executor.
#[derive(Debug, Clone, Default)]
pub struct QueryRouter {
    config: RouterConfig,
}

impl QueryRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route one request.
    ///
    /// Parameter presence is checked first, then whitelists and integer
    /// coercion, and only then is the executor called. Any executor failure
    /// aborts the whole operation as [`QueryError::Database`].
    pub async fn route<E>(
        &self,
        executor: &mut E,
        resource: ResourcePath,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        tracing::info!(resource = %resource, params = params.len(), "Routing query");

        let result = match resource {
            ResourcePath::MerchantDetails => self.merchant_details(executor, params).await,
            ResourcePath::MerchantStats => self.merchant_stats(executor, params).await,
            ResourcePath::FilterMerchantStats => self.filter_merchant_stats(executor, params).await,
            ResourcePath::FilterMerchantField => self.filter_merchant_field(executor, params).await,
            ResourcePath::SearchMerchants => self.search_merchants(executor, params).await,
            ResourcePath::FilterTransactions => self.filter_transactions(executor, params).await,
            ResourcePath::Authorizations => {
                self.transactions(executor, TransactionTable::Authorizations, params)
                    .await
            }
            ResourcePath::Settlements => {
                self.transactions(executor, TransactionTable::Settlements, params)
                    .await
            }
        };

        if let Err(err) = &result {
            tracing::warn!(resource = %resource, status = err.status_code(), error = %err, "Query failed");
        }
        result
    }

    // =========================================================================
    // SINGLE ENTITY BY KEY
    // =========================================================================

    async fn merchant_details<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let merchant_number = params.require("merchant_number")?;

        let query = SelectBuilder::from(MERCHANT_DETAILS_TABLE)
            .where_eq("merchant_number", SqlParam::text(merchant_number))
            .limit(1);

        run(executor, &query)
            .await?
            .into_first_row()
            .map(QueryOutcome::Item)
            .ok_or_else(|| QueryError::merchant_not_found(merchant_number))
    }

    async fn merchant_stats<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let merchant_number = params.require("merchant_number")?;
        let stat_date = params.require("stat_date")?;

        let query = SelectBuilder::from(MERCHANT_STATS_TABLE)
            .where_eq("merchant_number", SqlParam::text(merchant_number))
            .where_eq("bucket_date", SqlParam::text(stat_date))
            .order_desc("updated_at", true)
            .limit(1);

        run(executor, &query)
            .await?
            .into_first_row()
            .map(QueryOutcome::Item)
            .ok_or_else(|| QueryError::stats_not_found(merchant_number, stat_date))
    }

    /// Id lookup when an id parameter is present, otherwise the merchant
    /// range query.
    async fn transactions<E>(
        &self,
        executor: &mut E,
        table: TransactionTable,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        match params.first_of(table.id_params()) {
            Some((name, raw)) => self.transaction_by_id(executor, table, name, raw).await,
            None => self.transactions_by_merchant(executor, table, params).await,
        }
    }

    async fn transaction_by_id<E>(
        &self,
        executor: &mut E,
        table: TransactionTable,
        param_name: &str,
        raw_id: &str,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let id: i64 = raw_id
            .trim()
            .parse()
            .map_err(|_| QueryError::invalid_integer(param_name, "an integer"))?;

        let query = SelectBuilder::from(table.name())
            .where_eq("id", SqlParam::Int(id))
            .limit(1);

        run(executor, &query)
            .await?
            .into_first_row()
            .map(QueryOutcome::Item)
            .ok_or_else(|| QueryError::transaction_not_found(id))
    }

    // =========================================================================
    // METRIC PROJECTION
    // =========================================================================

    async fn filter_merchant_stats<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let merchant_number = params.require("merchant_number")?;
        let period = params.get("stat_date").unwrap_or(DEFAULT_PERIOD);

        let projection: Vec<&'static str> = match params.get("metric_type") {
            None => MERCHANT_STATS_COLUMNS.to_vec(),
            Some(metric) if metric.eq_ignore_ascii_case(ALL_METRICS) => {
                MERCHANT_STATS_COLUMNS.to_vec()
            }
            Some(metric) => {
                let prefixes = catalog::metric_prefixes(metric)
                    .ok_or_else(|| QueryError::invalid_metric_type(&catalog::metric_types()))?;
                let subset = self.metric_columns(executor, prefixes).await?;
                if subset.is_empty() {
                    return Err(QueryError::no_metric_columns(metric));
                }
                MERCHANT_STATS_KEY_COLUMNS
                    .iter()
                    .copied()
                    .chain(subset)
                    .collect()
            }
        };

        let query = SelectBuilder::from(MERCHANT_STATS_TABLE)
            .columns(projection)
            .where_eq("merchant_number", SqlParam::text(merchant_number))
            .where_eq("bucket_date", SqlParam::text(period))
            .order_desc("updated_at", true)
            .limit(1);

        run(executor, &query)
            .await?
            .into_first_row()
            .map(QueryOutcome::Item)
            .ok_or_else(|| QueryError::period_stats_not_found(merchant_number, period))
    }

    /// Live `merchant_stats` columns matching `prefixes`, prefix by prefix,
    /// restricted to the whitelist.
    async fn metric_columns<E>(
        &self,
        executor: &mut E,
        prefixes: &[&str],
    ) -> Result<Vec<&'static str>, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let columns_query = SelectBuilder::from(MERCHANT_STATS_TABLE).limit(0);
        let live = run(executor, &columns_query).await?.column_names();

        let mut selected = Vec::new();
        for prefix in prefixes {
            for column in live.iter().filter(|c| c.starts_with(prefix)) {
                match catalog::stats_column(column) {
                    Some(known) if !selected.contains(&known) => selected.push(known),
                    Some(_) => {}
                    None => {
                        tracing::debug!(column = %column, "Skipping non-whitelisted stats column");
                    }
                }
            }
        }
        Ok(selected)
    }

    // =========================================================================
    // FILTER BY SINGLE FIELD
    // =========================================================================

    async fn filter_merchant_field<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let merchant_number = params.require("merchant_number")?;
        let requested = match params.get("field") {
            Some(field) => field.to_string(),
            None => match params.get("filter") {
                Some(raw) => field_from_filter(raw)?
                    .ok_or_else(|| QueryError::missing_parameter("field"))?,
                None => return Err(QueryError::missing_parameter("field")),
            },
        };
        let field = catalog::merchant_field(&requested)
            .ok_or_else(|| QueryError::invalid_merchant_field(MERCHANT_FIELDS))?;

        let query = SelectBuilder::from(MERCHANT_DETAILS_TABLE)
            .columns([field])
            .where_eq("merchant_number", SqlParam::text(merchant_number))
            .limit(1);

        let row = run(executor, &query)
            .await?
            .into_first_row()
            .ok_or_else(|| QueryError::merchant_not_found(merchant_number))?;

        let value = row.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null);
        let mut item = Row::new();
        item.insert(field.to_string(), value);
        Ok(QueryOutcome::Item(item))
    }

    async fn filter_transactions<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let table_name = params.get("table").unwrap_or("authorizations");
        let (Some(requested), Some(value)) = (params.get("field"), params.get("value")) else {
            return Err(QueryError::missing_field_and_value());
        };
        let table = TransactionTable::from_name(table_name)
            .ok_or_else(|| QueryError::invalid_table(table_name))?;
        let field = table
            .filter_field(requested)
            .ok_or_else(|| QueryError::invalid_transaction_field(table.name(), table.filter_fields()))?;

        let query = SelectBuilder::from(table.name())
            .where_text_eq(field, value)
            .order_desc(table.date_column(), false)
            .limit(self.config.max_rows);

        let rows = run(executor, &query).await?.into_rows();
        if rows.is_empty() {
            return Err(QueryError::no_transactions_matching(field, value));
        }
        let count = rows.len();
        Ok(QueryOutcome::Items {
            items: rows,
            count: Some(count),
        })
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    async fn search_merchants<E>(
        &self,
        executor: &mut E,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let page = params.int_in_range("page", 1, 1, u32::MAX)?;
        let page_size = params.int_in_range(
            "page_size",
            self.config.default_page_size,
            1,
            self.config.max_page_size,
        )?;

        let mut query = SelectBuilder::from(MERCHANT_DETAILS_TABLE);
        if let Some(name) = params.get("business_name") {
            query = query.where_contains("business_name", name);
        }
        if let Some(code) = params.get("category_code") {
            query = query.where_eq("merchant_category_code", SqlParam::text(code));
        }
        if let Some(status) = params.get("status") {
            query = query.where_eq("merchant_id_status", SqlParam::text(status));
        }
        let offset = u64::from(page - 1) * u64::from(page_size);
        let query = query
            .order_asc("merchant_number")
            .paginate(page_size, offset);

        let items = execute(executor, query.build()).await?.into_rows();
        let total = count_total(execute(executor, query.build_count()).await?)?;

        Ok(QueryOutcome::Page {
            items,
            pagination: Pagination::new(total, page, page_size),
        })
    }

    // =========================================================================
    // RANGE QUERY
    // =========================================================================

    async fn transactions_by_merchant<E>(
        &self,
        executor: &mut E,
        table: TransactionTable,
        params: &ParameterSet,
    ) -> Result<QueryOutcome, QueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let merchant_number = params.require("merchant_number")?;
        let max_rows = self.config.max_rows;
        let limit = params.int_in_range("limit", max_rows, 1, max_rows)?;

        let mut query = SelectBuilder::from(table.name())
            .where_eq("merchant_number", SqlParam::text(merchant_number))
            .where_window(
                table.date_column(),
                table.date_cast(),
                params.get("date_from"),
                params.get("date_to"),
            );
        if table.has_approval_status()
            && let Some(status) = params.get("approval_status")
        {
            query = query.where_eq("approval_status", SqlParam::text(status));
        }
        let query = query.order_desc(table.date_column(), false).limit(limit);

        let rows = run(executor, &query).await?.into_rows();
        if rows.is_empty() {
            return Err(QueryError::no_transactions_for_merchant(merchant_number));
        }
        Ok(QueryOutcome::Items {
            items: rows,
            count: None,
        })
    }
}

async fn run<E>(executor: &mut E, query: &SelectBuilder) -> Result<RowSet, QueryError>
where
    E: QueryExecutor + ?Sized,
{
    execute(executor, query.build()).await
}

async fn execute<E>(
    executor: &mut E,
    (sql, params): (String, Vec<SqlParam>),
) -> Result<RowSet, QueryError>
where
    E: QueryExecutor + ?Sized,
{
    tracing::debug!(sql = %sql, bound = params.len(), "Executing query");
    Ok(executor.execute(&sql, &params).await?)
}

/// `filter` arrives as a loosely quoted JSON object such as `{'field': 'city'}`.
fn field_from_filter(raw: &str) -> Result<Option<String>, QueryError> {
    let parsed: Value = serde_json::from_str(&raw.replace('\'', "\""))
        .map_err(|_| QueryError::invalid_filter_format())?;
    let object = parsed
        .as_object()
        .ok_or_else(QueryError::invalid_filter_format)?;
    Ok(object
        .get("field")
        .and_then(Value::as_str)
        .filter(|field| !field.is_empty())
        .map(str::to_string))
}

fn count_total(set: RowSet) -> Result<u64, QueryError> {
    let value = set
        .rows
        .first()
        .and_then(|row| row.first())
        .cloned()
        .unwrap_or(Value::Null);
    let total = match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    total.ok_or_else(|| {
        ExecutorError::Decode {
            column: "total".to_string(),
            message: format!("expected a row count, got {}", value),
        }
        .into()
    })
}
