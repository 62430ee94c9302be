//! Bedrock action-group event and response envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{name, value}` pair from `parameters` or the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaBody {
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: BTreeMap<String, MediaBody>,
}

/// Incoming action-group invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupEvent {
    #[serde(default)]
    pub action_group: String,
    #[serde(default)]
    pub api_path: String,
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub parameters: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub session_attributes: Map<String, Value>,
    #[serde(default)]
    pub prompt_session_attributes: Map<String, Value>,
}

impl ActionGroupEvent {
    /// Merged named inputs. JSON body properties override `parameters`
    /// entries with the same name.
    pub fn properties(&self) -> BTreeMap<String, Value> {
        let mut merged = BTreeMap::new();
        for prop in &self.parameters {
            merged.insert(prop.name.clone(), prop.value.clone());
        }
        if let Some(body) = self
            .request_body
            .as_ref()
            .and_then(|b| b.content.get("application/json"))
        {
            for prop in &body.properties {
                merged.insert(prop.name.clone(), prop.value.clone());
            }
        }
        merged
    }

    /// The `query` input, when present and non-empty.
    pub fn query(&self) -> Option<String> {
        match self.properties().remove("query")? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseText {
    pub body: String,
}

/// `response` member of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    pub response_body: BTreeMap<String, ResponseText>,
}

/// Envelope returned to the Bedrock agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupResponse {
    pub message_version: String,
    pub response: ActionResponse,
    pub session_attributes: Map<String, Value>,
    pub prompt_session_attributes: Map<String, Value>,
}

impl ActionGroupResponse {
    /// Echo the event's routing fields and session attributes around `body`.
    pub fn new(event: &ActionGroupEvent, status: u16, body: impl Into<String>) -> Self {
        let mut response_body = BTreeMap::new();
        response_body.insert(
            "application/json".to_string(),
            ResponseText { body: body.into() },
        );

        Self {
            message_version: "1.0".to_string(),
            response: ActionResponse {
                action_group: event.action_group.clone(),
                api_path: event.api_path.clone(),
                http_method: event.http_method.clone(),
                http_status_code: status,
                response_body,
            },
            session_attributes: event.session_attributes.clone(),
            prompt_session_attributes: event.prompt_session_attributes.clone(),
        }
    }

    /// Response carrying a JSON object serialized as text.
    pub fn json(event: &ActionGroupEvent, status: u16, body: &Value) -> Self {
        Self::new(event, status, body.to_string())
    }

    pub fn status(&self) -> u16 {
        self.response.http_status_code
    }

    pub fn body(&self) -> &str {
        self.response
            .response_body
            .get("application/json")
            .map(|r| r.body.as_str())
            .unwrap_or_default()
    }
}
