//! `fraudlens check` - validate configuration and show what it resolves to.

use anyhow::Result;
use fraudlens_core::FraudlensConfig;

pub fn execute(config: &FraudlensConfig) -> Result<()> {
    config.validate()?;

    for line in report(config) {
        println!("{}", line);
    }
    Ok(())
}

fn report(config: &FraudlensConfig) -> Vec<String> {
    let set = |value: Option<String>| match value {
        Some(v) => v,
        None => "<not set>".to_string(),
    };

    vec![
        format!(
            "upstream:  {} (credentials from env: {})",
            redact(&config.upstream.connection_string()),
            config.upstream.uses_env_credentials()
        ),
        format!("gateway:   {}", set(config.gateway.resolved_base_url())),
        format!(
            "api key:   {}",
            if config.gateway.resolved_api_key().is_some() {
                "configured"
            } else {
                "<not set>"
            }
        ),
        format!("mcp:       {:?} on {}{}", config.mcp.transport, config.mcp.bind_addr(), config.mcp.path),
        format!("agent:     {}", set(config.agent.resolved_runtime_url())),
        format!(
            "router:    max_rows={} page_size={}..{}",
            config.router.max_rows, config.router.default_page_size, config.router.max_page_size
        ),
    ]
}

/// Hide the password part of a connection URL.
fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((auth, host)) => match auth.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}
