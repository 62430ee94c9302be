//! API Gateway proxy event and response.

use std::collections::{BTreeMap, HashMap};

use fraudlens_query::ParameterSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fields of a proxy event the query handler reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub http_method: Option<String>,
    /// API Gateway sends `null` when the query string is empty.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ProxyRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn parameters(&self) -> ParameterSet {
        self.query_string_parameters
            .clone()
            .map(ParameterSet::from)
            .unwrap_or_default()
    }
}

/// `{statusCode, headers, body}` with a JSON string body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    pub fn json(status_code: u16, body: &Value) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);
        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// The body parsed back into JSON.
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}
