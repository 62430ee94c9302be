//! Schema and seed deployment.
//!
//! Runs a DDL script and then a DML script, each as one multi-statement batch
//! inside its own transaction. A failing phase is rolled back and the DML
//! phase never runs after a DDL failure.

use std::fmt;

use sqlx::Connection;
use sqlx::postgres::PgConnection;

/// Which script a deployment step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Ddl,
    Dml,
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployPhase::Ddl => f.write_str("DDL"),
            DeployPhase::Dml => f.write_str("DML"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to execute {phase} script: {source}")]
pub struct DeployError {
    pub phase: DeployPhase,
    #[source]
    pub source: sqlx::Error,
}

/// Rows affected per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub ddl_rows_affected: u64,
    pub dml_rows_affected: u64,
}

/// Apply `ddl` then `dml` on `conn`.
pub async fn apply_sql(
    conn: &mut PgConnection,
    ddl: &str,
    dml: &str,
) -> Result<DeployReport, DeployError> {
    let ddl_rows_affected = run_phase(conn, DeployPhase::Ddl, ddl).await?;
    tracing::info!(rows = ddl_rows_affected, "DDL executed successfully");

    let dml_rows_affected = run_phase(conn, DeployPhase::Dml, dml).await?;
    tracing::info!(rows = dml_rows_affected, "DML executed successfully");

    Ok(DeployReport {
        ddl_rows_affected,
        dml_rows_affected,
    })
}

async fn run_phase(
    conn: &mut PgConnection,
    phase: DeployPhase,
    script: &str,
) -> Result<u64, DeployError> {
    let wrap = |source: sqlx::Error| DeployError { phase, source };

    if script.trim().is_empty() {
        tracing::warn!(%phase, "Empty script, skipping");
        return Ok(0);
    }

    let mut tx = conn.begin().await.map_err(wrap)?;
    match sqlx::raw_sql(script).execute(&mut *tx).await {
        Ok(result) => {
            tx.commit().await.map_err(wrap)?;
            Ok(result.rows_affected())
        }
        Err(source) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(%phase, error = %rollback, "Rollback failed");
            }
            Err(wrap(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_phase() {
        let err = DeployError {
            phase: DeployPhase::Dml,
            source: sqlx::Error::PoolClosed,
        };
        assert!(err.to_string().starts_with("Failed to execute DML script: "));
    }
}
