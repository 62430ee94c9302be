//! Tool registry and the seam tool sets plug into.
//!
//! A [`ToolSet`] owns a fixed list of tool definitions and knows how to run
//! each of them against the API Gateway. The [`ToolRegistry`] keeps those
//! definitions in declaration order together with a compiled validator for
//! each input schema, so arguments are checked before any tool code runs.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::error::{GatewayError, McpError};
use crate::gateway::GatewayClient;
use crate::protocol::ToolDefinition;

/// A family of tools served by one MCP server.
#[async_trait]
pub trait ToolSet: Send + Sync {
    /// Name reported in `serverInfo`.
    fn server_name(&self) -> &'static str;

    fn tools(&self) -> Vec<ToolDefinition>;

    /// Run `name` with already-validated arguments and return the tool's JSON
    /// result. Gateway failures are folded into the result body.
    async fn call(&self, gateway: &GatewayClient, name: &str, args: &Arguments) -> Value;
}

struct RegisteredTool {
    definition: ToolDefinition,
    validator: jsonschema::Validator,
}

/// Registry of available MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every tool of `set`.
    pub fn from_set(set: &dyn ToolSet) -> Result<Self, McpError> {
        let mut registry = Self::new();
        for tool in set.tools() {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), McpError> {
        let validator =
            jsonschema::validator_for(&tool.input_schema).map_err(|e| McpError::InvalidSchema {
                tool: tool.name.clone(),
                reason: e.to_string(),
            })?;
        let entry = RegisteredTool {
            definition: tool,
            validator,
        };
        match self
            .tools
            .iter_mut()
            .find(|t| t.definition.name == entry.definition.name)
        {
            Some(existing) => *existing = entry,
            None => self.tools.push(entry),
        }
        Ok(())
    }

    /// Unregister a tool by name.
    pub fn unregister(&mut self, name: &str) -> Option<ToolDefinition> {
        let idx = self.tools.iter().position(|t| t.definition.name == name)?;
        Some(self.tools.remove(idx).definition)
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.entry(name).map(|t| &t.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// List all tools in registration order.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    /// Check `args` against the tool's input schema.
    ///
    /// Returns one message per violation, prefixed with the offending
    /// argument path. Unknown tools yield `None`.
    pub fn validate(&self, name: &str, args: &Value) -> Option<Result<(), Vec<String>>> {
        let tool = self.entry(name)?;
        let errors: Vec<String> = tool
            .validator
            .iter_errors(args)
            .map(|error| {
                let path = error.instance_path().to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {}", path, error)
                }
            })
            .collect();
        Some(if errors.is_empty() { Ok(()) } else { Err(errors) })
    }

    fn entry(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.definition.name == name)
    }
}

/// Validated tool arguments.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// String argument; `null` counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.text(name).unwrap_or(default)
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.0.get(name).and_then(Value::as_i64).unwrap_or(default)
    }

    /// String or integer argument rendered as text.
    pub fn id_text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// =============================================================================
// RESULT SHAPING
// =============================================================================

/// `{"error", "status_code"}` result for a failed gateway call.
pub(crate) fn error_result(err: &GatewayError) -> Value {
    json!({ "error": err.message, "status_code": err.status })
}

/// Same as [`error_result`] with an empty `items` list, for list-style tools.
pub(crate) fn list_error_result(err: &GatewayError) -> Value {
    json!({ "error": err.message, "status_code": err.status, "items": [] })
}

/// `reply[key]` when it is present and not empty.
pub(crate) fn non_empty<'a>(reply: &'a Value, key: &str) -> Option<&'a Value> {
    reply.get(key).filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    })
}

/// Rows of a list reply: `item` when it is a list, else `items`.
pub(crate) fn reply_rows(reply: &Value) -> Vec<Value> {
    non_empty(reply, "item")
        .or_else(|| non_empty(reply, "items"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Schema for `^MRCH\d+$` merchant numbers.
pub(crate) fn merchant_number_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
        "pattern": r"^MRCH\d+$"
    })
}
