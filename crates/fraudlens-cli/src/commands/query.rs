//! `fraudlens query` - run one query-data request from the shell.
//!
//! Goes through the same handler as the Lambda, so the printed envelope is
//! exactly what API Gateway would return.

use anyhow::Result;
use clap::Args;
use fraudlens_core::FraudlensConfig;
use fraudlens_lambda::{PgConnectionSource, ProxyRequest, QueryDataHandler};
use fraudlens_query::QueryRouter;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Resource path, e.g. /api/merchant/details
    pub path: String,

    /// Query parameters as name=value pairs.
    #[arg(value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Database URL. Overrides config file and DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn execute(args: QueryArgs, config: FraudlensConfig) -> Result<()> {
    let mut upstream = config.upstream;
    if let Some(url) = args.database_url {
        upstream.database_url = Some(url);
        upstream.database_url_env = None;
    }

    let handler = QueryDataHandler::new(
        QueryRouter::new(config.router),
        PgConnectionSource::new(upstream),
    );
    let request = args
        .params
        .into_iter()
        .fold(ProxyRequest::new(args.path), |request, (name, value)| {
            request.with_param(name, value)
        });

    let response = handler.handle(&request).await;
    println!("{}", serde_json::to_string_pretty(&response.body_json())?);

    if response.status_code >= 400 {
        anyhow::bail!("request failed with status {}", response.status_code);
    }
    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}
