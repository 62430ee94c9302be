//! Shared infrastructure for the Postgres end-to-end tests.

use std::process::Command;
use std::time::Duration;

use fraudlens_adapter_pg::{PgQueryExecutor, deploy};
use fraudlens_core::UpstreamConfig;
use fraudlens_query::{ParameterSet, QueryError, QueryOutcome, QueryRouter, ResourcePath};
use serde_json::Value;

// =============================================================================
// DOCKER CONTAINER CONFIGURATION
// =============================================================================

pub const CONTAINER_NAME: &str = "fraudlens_test_postgres";
pub const POSTGRES_PORT: u16 = 5434;
pub const POSTGRES_PASSWORD: &str = "fraudlens_test_password";
pub const DATABASE_NAME: &str = "fraudlens_test";

pub fn database_url() -> String {
    format!(
        "postgres://postgres:{}@localhost:{}/{}",
        POSTGRES_PASSWORD, POSTGRES_PORT, DATABASE_NAME
    )
}

pub fn start_postgres_container() -> Result<(), String> {
    let output = Command::new("docker")
        .args(["ps", "-a", "-q", "-f", &format!("name={}", CONTAINER_NAME)])
        .output()
        .map_err(|e| format!("Failed to check existing container: {}", e))?;

    if !String::from_utf8_lossy(&output.stdout).trim().is_empty() {
        let _ = Command::new("docker")
            .args(["rm", "-f", CONTAINER_NAME])
            .output();
    }

    let status = Command::new("docker")
        .args([
            "run",
            "-d",
            "--name",
            CONTAINER_NAME,
            "-e",
            &format!("POSTGRES_PASSWORD={}", POSTGRES_PASSWORD),
            "-e",
            &format!("POSTGRES_DB={}", DATABASE_NAME),
            "-p",
            &format!("{}:5432", POSTGRES_PORT),
            "postgres:16-alpine",
        ])
        .status()
        .map_err(|e| format!("Failed to start container: {}", e))?;

    if !status.success() {
        return Err("Failed to start PostgreSQL container".to_string());
    }
    Ok(())
}

pub fn stop_postgres_container() {
    let _ = Command::new("docker")
        .args(["rm", "-f", CONTAINER_NAME])
        .output();
}

pub fn upstream() -> UpstreamConfig {
    UpstreamConfig {
        database_url_env: None,
        database_url: Some(database_url()),
        connect_timeout_seconds: 5,
        ..Default::default()
    }
}

pub async fn wait_for_postgres() -> Result<PgQueryExecutor, String> {
    for attempt in 1..=30 {
        if let Ok(executor) = PgQueryExecutor::connect(&upstream()).await {
            println!("✅ PostgreSQL ready after {} attempts", attempt);
            return Ok(executor);
        }
        if attempt % 5 == 0 {
            println!("⏳ Waiting for PostgreSQL... (attempt {})", attempt);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Err("PostgreSQL did not become ready in time".to_string())
}

// =============================================================================
// DATABASE INITIALIZATION
// =============================================================================

const DDL_SQL: &str = include_str!("../fixtures/ddl.sql");
const DML_SQL: &str = include_str!("../fixtures/dml.sql");

pub async fn initialize_database(executor: &mut PgQueryExecutor) -> Result<(), String> {
    let report = deploy::apply_sql(executor.connection(), DDL_SQL, DML_SQL)
        .await
        .map_err(|e| e.to_string())?;
    println!(
        "✅ Database initialized ({} seed rows)",
        report.dml_rows_affected
    );
    Ok(())
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub upstream: UpstreamConfig,
    pub router: QueryRouter,
}

impl TestContext {
    pub async fn setup() -> Result<Self, String> {
        start_postgres_container()?;
        let mut executor = wait_for_postgres().await?;
        let seeded = initialize_database(&mut executor).await;
        let _ = executor.close().await;
        seeded.map_err(|e| format!("Failed to initialize database: {}", e))?;
        Ok(Self {
            upstream: upstream(),
            router: QueryRouter::default(),
        })
    }

    /// Route one request on a fresh connection, as the Lambda does.
    pub async fn route(
        &self,
        resource: ResourcePath,
        params: &[(&str, &str)],
    ) -> Result<QueryOutcome, QueryError> {
        let mut set = ParameterSet::new();
        for (name, value) in params {
            set.insert(*name, *value);
        }
        let mut executor = PgQueryExecutor::connect(&self.upstream)
            .await
            .expect("connect to test database");
        let result = self.router.route(&mut executor, resource, &set).await;
        executor.close().await.expect("close connection");
        result
    }

    /// Route and require success.
    pub async fn ok(&self, resource: ResourcePath, params: &[(&str, &str)]) -> QueryOutcome {
        match self.route(resource, params).await {
            Ok(outcome) => outcome,
            Err(err) => panic!("{} {:?} failed: {}", resource, params, err),
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        stop_postgres_container();
        println!("🧹 Cleaned up PostgreSQL container");
    }
}

// =============================================================================
// RESULT HELPERS
// =============================================================================

/// Values of `column` across the rows of a list outcome.
pub fn column(outcome: &QueryOutcome, column: &str) -> Vec<Value> {
    outcome
        .items()
        .iter()
        .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
        .collect()
}
