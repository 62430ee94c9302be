use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fraudlens_core::FraudlensConfig;

mod commands;

use commands::{ask, check, deploy, query, serve};

#[derive(Parser, Debug)]
#[command(name = "fraudlens", version, about = "Fraudlens merchant and transaction services")]
struct Cli {
    /// YAML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true, env = "FRAUDLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the merchant or transaction MCP tools.
    Serve(serve::ServeArgs),

    /// List the tools one MCP server exposes.
    Tools(serve::ToolsArgs),

    /// Run one query-data request against the configured database.
    Query(query::QueryArgs),

    /// Apply schema (DDL) and seed (DML) scripts.
    Deploy(deploy::DeployArgs),

    /// Ask the investigation agent a question through an action group.
    Ask(ask::AskArgs),

    /// Validate the configuration and print the resolved values.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries MCP stdio traffic and command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FraudlensConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Serve(args) => serve::execute(args, config).await?,
        Command::Tools(args) => serve::list_tools(args)?,
        Command::Query(args) => query::execute(args, config).await?,
        Command::Deploy(args) => deploy::execute(args, config).await?,
        Command::Ask(args) => ask::execute(args, config).await?,
        Command::Check => check::execute(&config)?,
    }

    Ok(())
}
