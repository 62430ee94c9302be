use std::time::Duration;

use async_trait::async_trait;
use fraudlens_core::UpstreamConfig;
use fraudlens_query::{ExecutorError, QueryExecutor, RowSet, SqlParam};
use serde_json::{Value, json};
use sqlx::postgres::{
    PgArguments, PgConnection, PgRow, PgTypeInfo, PgValueFormat, PgValueRef, Postgres,
};
use sqlx::{Arguments, Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};

pub mod deploy;

pub use deploy::{DeployError, DeployPhase, DeployReport};

fn args_add<T>(args: &mut PgArguments, v: T) -> Result<(), ExecutorError>
where
    T: Send + Sync + 'static,
    for<'q> T: sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    args.add(v)
        .map_err(|e| ExecutorError::Driver(format!("cannot bind parameter: {}", e)))
}

/// Failure to open the upstream connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("connection timed out after {0}s")]
    Timeout(u64),
}

/// Open one connection described by `config`.
pub async fn connect(config: &UpstreamConfig) -> Result<PgConnection, ConnectError> {
    let url = config.connection_string();
    let timeout = config.connect_timeout_seconds;
    tracing::debug!(host = %config.host, timeout, "Opening upstream connection");

    match tokio::time::timeout(Duration::from_secs(timeout), PgConnection::connect(&url)).await {
        Ok(conn) => Ok(conn?),
        Err(_) => Err(ConnectError::Timeout(timeout)),
    }
}

/// [`QueryExecutor`] over a single Postgres connection.
///
/// The connection is owned for the lifetime of one request and must be
/// handed back through [`PgQueryExecutor::close`].
pub struct PgQueryExecutor {
    conn: PgConnection,
}

impl PgQueryExecutor {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    pub async fn connect(config: &UpstreamConfig) -> Result<Self, ConnectError> {
        Ok(Self::new(connect(config).await?))
    }

    /// Terminate the connection cleanly.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<RowSet, ExecutorError> {
        // Columns come from the statement description so that zero-row
        // results (and `LIMIT 0` column reads) still report them. The statement is
        // cached with the parameter types the binds are encoded as; otherwise
        // Postgres infers `int4` or `timestamp` and the binary binds mismatch.
        let param_types: Vec<PgTypeInfo> = params.iter().map(param_type).collect();
        let statement = (&mut self.conn)
            .prepare_with(sql, &param_types)
            .await
            .map_err(driver_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut args = PgArguments::default();
        for param in params {
            match param {
                SqlParam::Text(s) => args_add(&mut args, s.clone())?,
                SqlParam::Int(n) => args_add(&mut args, *n)?,
            }
        }

        let rows = sqlx::query_with(sql, args)
            .fetch_all(&mut self.conn)
            .await
            .map_err(driver_error)?;
        tracing::debug!(rows = rows.len(), "Query returned");

        let rows = rows
            .iter()
            .map(row_values)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RowSet::new(columns, rows))
    }
}

/// Wire type of a bound parameter.
fn param_type(param: &SqlParam) -> PgTypeInfo {
    match param {
        SqlParam::Text(_) => <String as sqlx::Type<Postgres>>::type_info(),
        SqlParam::Int(_) => <i64 as sqlx::Type<Postgres>>::type_info(),
    }
}

/// Driver message without sqlx's wrapper text.
fn driver_error(err: sqlx::Error) -> ExecutorError {
    let message = match err.as_database_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    };
    ExecutorError::Driver(message)
}

fn row_values(row: &PgRow) -> Result<Vec<Value>, ExecutorError> {
    (0..row.columns().len())
        .map(|idx| column_value(row, idx))
        .collect()
}

/// Decode one column by its Postgres type. Numerics, dates and timestamps
/// are rendered as strings.
fn column_value(row: &PgRow, idx: usize) -> Result<Value, ExecutorError> {
    let column = &row.columns()[idx];
    let decode_err = |e: sqlx::Error| ExecutorError::Decode {
        column: column.name().to_string(),
        message: e.to_string(),
    };

    if row.try_get_raw(idx).map_err(decode_err)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match column.type_info().name() {
        "BOOL" => json!(row.try_get::<bool, _>(idx).map_err(decode_err)?),
        "INT2" => json!(row.try_get::<i16, _>(idx).map_err(decode_err)?),
        "INT4" => json!(row.try_get::<i32, _>(idx).map_err(decode_err)?),
        "INT8" => json!(row.try_get::<i64, _>(idx).map_err(decode_err)?),
        "FLOAT4" => float_value(f64::from(row.try_get::<f32, _>(idx).map_err(decode_err)?)),
        "FLOAT8" => float_value(row.try_get::<f64, _>(idx).map_err(decode_err)?),
        "NUMERIC" => {
            let raw = row.try_get_raw(idx).map_err(decode_err)?;
            let decimal = row
                .try_get::<bigdecimal::BigDecimal, _>(idx)
                .map_err(decode_err)?;
            Value::String(numeric_text(&raw, decimal))
        }
        "DATE" => Value::String(
            row.try_get::<chrono::NaiveDate, _>(idx)
                .map_err(decode_err)?
                .to_string(),
        ),
        "TIME" => Value::String(
            row.try_get::<chrono::NaiveTime, _>(idx)
                .map_err(decode_err)?
                .to_string(),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<chrono::NaiveDateTime, _>(idx)
                .map_err(decode_err)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMPTZ" => Value::String(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
                .map_err(decode_err)?
                .to_rfc3339(),
        ),
        "UUID" => Value::String(
            row.try_get::<uuid::Uuid, _>(idx)
                .map_err(decode_err)?
                .to_string(),
        ),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx).map_err(decode_err)?,
        other => match row.try_get::<String, _>(idx) {
            Ok(text) => Value::String(text),
            Err(_) => {
                tracing::warn!(column = %column.name(), pg_type = %other, "Unsupported column type, returning null");
                Value::Null
            }
        },
    };
    Ok(value)
}

/// Render a numeric with the scale Postgres displays it with, so that a
/// `NUMERIC(10,2)` value of `12.50` stays `12.50`.
fn numeric_text(raw: &PgValueRef<'_>, decimal: bigdecimal::BigDecimal) -> String {
    if raw.format() == PgValueFormat::Text
        && let Ok(text) = raw.as_str()
    {
        return text.to_string();
    }
    match raw.as_bytes().ok().and_then(numeric_display_scale) {
        Some(scale) => decimal.with_scale(i64::from(scale)).to_plain_string(),
        None => decimal.to_plain_string(),
    }
}

/// `dscale` from the binary numeric header
/// (`ndigits`, `weight`, `sign`, `dscale`, each two bytes).
fn numeric_display_scale(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [_, _, _, _, _, _, hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

/// Non-finite floats have no JSON form.
fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_value() {
        assert_eq!(float_value(1.5), json!(1.5));
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_param_types_match_encoding() {
        assert_eq!(param_type(&SqlParam::text("MRCH1")).to_string(), "TEXT");
        assert_eq!(param_type(&SqlParam::Int(7)).to_string(), "INT8");
    }

    #[test]
    fn test_numeric_display_scale() {
        // 12.50 as NUMERIC(10,2): ndigits 2, weight 0, sign +, dscale 2, digits 12 5000
        let bytes = [0, 2, 0, 0, 0, 0, 0, 2, 0, 12, 0x13, 0x88];
        assert_eq!(numeric_display_scale(&bytes), Some(2));
        assert_eq!(numeric_display_scale(&[0, 0, 0]), None);
    }

    #[test]
    fn test_rescaled_numeric_keeps_trailing_zeros() {
        use std::str::FromStr;
        let decoded = bigdecimal::BigDecimal::from_str("12.5000").unwrap();
        assert_eq!(decoded.with_scale(2).to_plain_string(), "12.50");
        let whole = bigdecimal::BigDecimal::from_str("1500").unwrap();
        assert_eq!(whole.with_scale(2).to_plain_string(), "1500.00");
    }

    #[test]
    fn test_driver_error_keeps_plain_message() {
        let err = driver_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, ExecutorError::Driver(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_timestamp_format_drops_zero_fraction() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            "2024-03-01T09:30:00"
        );
    }

    #[tokio::test]
    async fn test_connect_refused_is_error() {
        let config = UpstreamConfig {
            database_url_env: None,
            database_url: Some("postgresql://nobody@127.0.0.1:1/none".to_string()),
            connect_timeout_seconds: 2,
            ..Default::default()
        };
        assert!(PgQueryExecutor::connect(&config).await.is_err());
    }
}
