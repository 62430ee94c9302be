//! `fraudlens serve` and `fraudlens tools`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use fraudlens_core::{FraudlensConfig, McpConfig, Transport};
use fraudlens_mcp::{GatewayClient, McpServer, MerchantTools, ToolSet, TransactionTools};
use tracing::info;

/// Which tool server to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerKind {
    Merchant,
    Transaction,
}

impl ServerKind {
    fn tool_set(self) -> Box<dyn ToolSet> {
        match self {
            ServerKind::Merchant => Box::new(MerchantTools),
            ServerKind::Transaction => Box::new(TransactionTools),
        }
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Tool server to start.
    #[arg(value_enum)]
    pub server: ServerKind,

    /// Transport type (stdio or http). Overrides config file.
    #[arg(long)]
    pub transport: Option<String>,

    /// HTTP bind host. Overrides config file.
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port. Overrides config file.
    #[arg(long)]
    pub port: Option<u16>,

    /// API Gateway base URL. Overrides config file and environment.
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// README served as the `file://README.md` resource.
    #[arg(long)]
    pub readme: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ToolsArgs {
    #[arg(value_enum)]
    pub server: ServerKind,

    /// Print full input schemas.
    #[arg(long)]
    pub verbose: bool,
}

pub async fn execute(args: ServeArgs, config: FraudlensConfig) -> Result<()> {
    let mcp = mcp_config(&args, config.mcp)?;

    let mut gateway_config = config.gateway;
    if let Some(url) = args.gateway_url {
        gateway_config.base_url = Some(url);
        gateway_config.base_url_env = String::new();
    }
    let gateway = GatewayClient::from_config(&gateway_config)?;

    info!(
        server = ?args.server,
        transport = ?mcp.transport,
        gateway = %gateway.base_url(),
        "Starting MCP server"
    );
    if mcp.is_http() {
        info!(addr = %mcp.bind_addr(), path = %mcp.path, "HTTP transport");
    }

    let server = match args.server {
        ServerKind::Merchant => McpServer::merchant(mcp, gateway)?,
        ServerKind::Transaction => McpServer::transaction(mcp, gateway)?,
    };
    server.run().await.context("MCP server stopped with an error")
}

/// Apply command-line overrides on top of the configured MCP section.
fn mcp_config(args: &ServeArgs, mut mcp: McpConfig) -> Result<McpConfig> {
    if let Some(transport) = args.transport.as_deref() {
        mcp.transport = match transport {
            "stdio" => Transport::Stdio,
            "http" => Transport::Http,
            other => anyhow::bail!("Unknown transport: {}. Use 'stdio' or 'http'", other),
        };
    }
    if let Some(host) = &args.host {
        mcp.host = host.clone();
    }
    if let Some(port) = args.port {
        mcp.port = port;
    }
    if let Some(readme) = &args.readme {
        mcp.readme_path = readme.clone();
    }
    Ok(mcp)
}

pub fn list_tools(args: ToolsArgs) -> Result<()> {
    let tool_set = args.server.tool_set();
    println!("{} tools:", tool_set.server_name());
    for tool in tool_set.tools() {
        println!();
        println!("  {}", tool.name);
        if let Some(description) = &tool.description {
            for line in description.lines().filter(|l| !l.trim().is_empty()) {
                println!("    {}", line.trim());
            }
        }
        if args.verbose {
            println!("    schema: {}", serde_json::to_string_pretty(&tool.input_schema)?);
        }
    }
    Ok(())
}
