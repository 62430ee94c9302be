//! `fraudlens deploy` - apply the schema and seed scripts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use fraudlens_adapter_pg::deploy::apply_sql;
use fraudlens_adapter_pg::{DeployReport, PgQueryExecutor};
use fraudlens_core::FraudlensConfig;
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// DDL script, run first.
    #[arg(long, default_value = "schema/ddl.sql")]
    pub ddl: PathBuf,

    /// DML script, run after the DDL commits.
    #[arg(long, default_value = "schema/dml.sql")]
    pub dml: PathBuf,

    /// Database URL. Overrides config file and DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn execute(args: DeployArgs, config: FraudlensConfig) -> Result<()> {
    let ddl = read_script(&args.ddl).await?;
    let dml = read_script(&args.dml).await?;

    let mut upstream = config.upstream;
    if let Some(url) = args.database_url {
        upstream.database_url = Some(url);
        upstream.database_url_env = None;
    }

    info!(host = %upstream.host, "Connecting to database");
    let mut executor = PgQueryExecutor::connect(&upstream).await?;
    let result = apply_sql(executor.connection(), &ddl, &dml).await;
    if let Err(err) = executor.close().await {
        tracing::warn!(error = %err, "Closing connection failed");
    }

    let report = result?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary(&args.ddl, &args.dml, &report))?
    );
    Ok(())
}

async fn read_script(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read script: {}", path.display()))
}

fn summary(ddl: &Path, dml: &Path, report: &DeployReport) -> Value {
    json!({
        "message": "Successfully executed scripts",
        "details": {
            "ddl_content": ddl.display().to_string(),
            "dml_content": dml.display().to_string(),
            "ddl_rows_affected": report.ddl_rows_affected,
            "dml_rows_affected": report.dml_rows_affected,
        }
    })
}
