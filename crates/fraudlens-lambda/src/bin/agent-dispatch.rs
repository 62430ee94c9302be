use std::sync::Arc;
use std::time::Duration;

use fraudlens_agent::{ActionGroupEvent, ActionGroupResponse, Dispatcher, HttpAgentBackend};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};

/// Agent runs can be long; this matches the function timeout.
const AGENT_TIMEOUT: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Error> {
    fraudlens_lambda::init_tracing();

    let config = fraudlens_lambda::load_config()?;
    let backend = HttpAgentBackend::from_config(&config.agent, AGENT_TIMEOUT)?;
    let dispatcher = Dispatcher::new(config.agent.clone(), Arc::new(backend));
    let dispatcher = &dispatcher;

    run(service_fn(move |event: LambdaEvent<ActionGroupEvent>| async move {
        let (event, context) = event.into_parts();
        tracing::info!(request_id = %context.request_id, "Dispatching action-group event");
        Ok::<ActionGroupResponse, Error>(dispatcher.dispatch(&event).await)
    }))
    .await
}
