//! Action groups: which system prompt and which MCP endpoints answer a call.

use fraudlens_core::AgentConfig;
use serde::Serialize;

/// How the backend should connect to an MCP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointTransport {
    StreamableHttp,
    Sse,
}

/// One MCP server the agent may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub url: String,
    pub transport: EndpointTransport,
}

/// The four action groups the Bedrock agent routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGroup {
    MerchantPortfolio,
    MerchantStats,
    Transaction,
    Internet,
}

impl ActionGroup {
    pub const ALL: [ActionGroup; 4] = [
        ActionGroup::MerchantPortfolio,
        ActionGroup::MerchantStats,
        ActionGroup::Transaction,
        ActionGroup::Internet,
    ];

    /// Look up by `apiPath`; a leading `/` is ignored.
    pub fn from_api_path(api_path: &str) -> Option<Self> {
        let name = api_path.strip_prefix('/').unwrap_or(api_path);
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionGroup::MerchantPortfolio => "merchant_portfolio_agent",
            ActionGroup::MerchantStats => "merchant_stats_agent",
            ActionGroup::Transaction => "transaction_agent",
            ActionGroup::Internet => "internet_agent",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            ActionGroup::MerchantPortfolio => {
                "This agent can answer questions related to merchants portfolio and fetch data \
                 such as the merchant name, address, website, phone number and other merchant \
                 metadata"
            }
            ActionGroup::MerchantStats => {
                "This agent can answer questions related to merchants aggregated data such as \
                 total sales for the last 12 month (year), month, daily. and average chargeback, \
                 total decline transactions"
            }
            ActionGroup::Transaction => {
                "This agent can answer questions related to raw transactions that the merchant \
                 process such as authorizations and settlements data but it can't answer \
                 questions about merchant aggregated data such average, total , min, max \
                 transactions"
            }
            ActionGroup::Internet => {
                "This agent answer questions about online data related to the merchant such as- \
                 perform online searches and fetch different website sites content. for online \
                 search use the brave_web_search tool, for fetching a specific web page use the \
                 fetch tool"
            }
        }
    }

    /// MCP endpoints for this group, built from the configured hosts.
    pub fn endpoints(&self, config: &AgentConfig) -> Vec<Endpoint> {
        let mcp = |host: String| Endpoint {
            url: format!("http://{}{}", host, config.resolved_mcp_path()),
            transport: EndpointTransport::StreamableHttp,
        };
        let sse = |host: String| Endpoint {
            url: format!("http://{}/sse", host),
            transport: EndpointTransport::Sse,
        };

        match self {
            ActionGroup::MerchantPortfolio | ActionGroup::MerchantStats => {
                vec![mcp(config.resolved_merchant_host())]
            }
            ActionGroup::Transaction => vec![mcp(config.resolved_transaction_host())],
            ActionGroup::Internet => vec![
                sse(config.resolved_search_host()),
                sse(config.resolved_fetch_host()),
            ],
        }
    }
}
