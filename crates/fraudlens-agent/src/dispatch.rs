//! Action-group dispatch.

use std::sync::Arc;

use fraudlens_core::AgentConfig;

use crate::backend::{AgentBackend, AgentRequest};
use crate::error::AgentError;
use crate::event::{ActionGroupEvent, ActionGroupResponse};
use crate::groups::ActionGroup;

/// Routes action-group events to the agent backend.
#[derive(Clone)]
pub struct Dispatcher {
    config: AgentConfig,
    backend: Arc<dyn AgentBackend>,
}

impl Dispatcher {
    pub fn new(config: AgentConfig, backend: Arc<dyn AgentBackend>) -> Self {
        Self { config, backend }
    }

    /// Answer one event. Every failure is reported inside the envelope.
    pub async fn dispatch(&self, event: &ActionGroupEvent) -> ActionGroupResponse {
        tracing::info!(
            action_group = %event.action_group,
            api_path = %event.api_path,
            "Received action-group event"
        );

        match self.answer(event).await {
            Ok(text) => {
                tracing::info!(api_path = %event.api_path, chars = text.len(), "Agent answered");
                ActionGroupResponse::new(event, 200, text)
            }
            Err(err) => {
                if err.status_code() >= 500 {
                    tracing::error!(api_path = %event.api_path, error = %err, "Agent call failed");
                } else {
                    tracing::warn!(api_path = %event.api_path, error = %err, "Rejected event");
                }
                ActionGroupResponse::json(event, err.status_code(), &err.to_body())
            }
        }
    }

    /// Build the backend request for `event` without running it.
    pub fn plan(&self, event: &ActionGroupEvent) -> Result<AgentRequest, AgentError> {
        let group = ActionGroup::from_api_path(&event.api_path)
            .ok_or_else(|| AgentError::UnknownOperation(event.api_path.clone()))?;
        let query = event.query().ok_or(AgentError::MissingQuery)?;

        Ok(AgentRequest {
            model_id: self.config.resolved_model_id(),
            system_prompt: group.system_prompt().to_string(),
            query,
            endpoints: group.endpoints(&self.config),
            temperature: self.config.temperature,
        })
    }

    async fn answer(&self, event: &ActionGroupEvent) -> Result<String, AgentError> {
        let request = self.plan(event)?;
        tracing::info!(
            endpoints = ?request.endpoints.iter().map(|e| e.url.as_str()).collect::<Vec<_>>(),
            "Calling agent"
        );
        self.backend.invoke(&request).await
    }
}
