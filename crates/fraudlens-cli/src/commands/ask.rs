//! `fraudlens ask` - put a question to the agent through an action group.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use fraudlens_agent::{ActionGroupEvent, Dispatcher, HttpAgentBackend, Property};
use fraudlens_core::FraudlensConfig;
use serde_json::Value;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question for the agent.
    pub question: String,

    /// Action group, e.g. merchant_stats_agent or transaction_agent.
    #[arg(long, default_value = "merchant_portfolio_agent")]
    pub group: String,

    /// Agent runtime URL. Overrides config file and environment.
    #[arg(long)]
    pub runtime_url: Option<String>,

    /// Seconds to wait for the agent.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Print the request that would be sent instead of sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// Write the answer to this file instead of stdout.
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

pub async fn execute(args: AskArgs, config: FraudlensConfig) -> Result<()> {
    let mut agent = config.agent;
    if let Some(url) = &args.runtime_url {
        agent.runtime_url = Some(url.clone());
        agent.runtime_url_env = String::new();
    }
    let event = event(&args.group, &args.question);

    if args.dry_run {
        let dispatcher = Dispatcher::new(agent, Arc::new(DryRun));
        let request = dispatcher.plan(&event)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let backend = HttpAgentBackend::from_config(&agent, Duration::from_secs(args.timeout))?;
    let response = Dispatcher::new(agent, Arc::new(backend))
        .dispatch(&event)
        .await;

    if response.status() >= 400 {
        anyhow::bail!("agent returned {}: {}", response.status(), response.body());
    }

    match &args.output_file {
        Some(path) => {
            tokio::fs::write(path, response.body())
                .await
                .with_context(|| format!("Failed to write answer to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Answer written");
        }
        None => println!("{}", response.body()),
    }
    Ok(())
}

/// The event Bedrock would send for `question` on `group`.
fn event(group: &str, question: &str) -> ActionGroupEvent {
    ActionGroupEvent {
        action_group: group.to_string(),
        api_path: group.to_string(),
        http_method: "POST".to_string(),
        parameters: vec![Property {
            name: "query".to_string(),
            kind: Some("string".to_string()),
            value: Value::String(question.to_string()),
        }],
        ..Default::default()
    }
}

/// Backend for `--dry-run`; planning never reaches it.
struct DryRun;

#[async_trait::async_trait]
impl fraudlens_agent::AgentBackend for DryRun {
    async fn invoke(
        &self,
        _request: &fraudlens_agent::AgentRequest,
    ) -> Result<String, fraudlens_agent::AgentError> {
        Err(fraudlens_agent::AgentError::Backend("dry run".to_string()))
    }
}
