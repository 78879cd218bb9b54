//! Tool descriptor and invocation types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Normalized tool arguments: string keys to JSON values
pub type ArgMap = serde_json::Map<String, Value>;

/// Tool descriptor advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    pub parameters: Value,
}

impl ToolSpec {
    /// Create a new tool descriptor with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({ "type": "object" }),
        }
    }

    /// Set the parameter schema
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = schema;
        self
    }

    /// Wire form expected by the chat backend's `tools` field
    pub fn to_request_value(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Correlation id; the agent synthesizes one when the model omits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The function being invoked
    pub function: FunctionCall,
}

/// Name and arguments of an invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: ToolArguments,
}

/// Invocation arguments as they appear on the wire: either an
/// already-structured object or a raw JSON-encoded string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    Structured(ArgMap),
    Raw(String),
}

impl Default for ToolArguments {
    fn default() -> Self {
        ToolArguments::Structured(ArgMap::new())
    }
}

impl ToolArguments {
    /// Normalize to a key/value map. Returns `None` when a raw payload
    /// does not parse as a JSON object; the caller decides the fallback.
    pub fn normalize(&self) -> Option<ArgMap> {
        match self {
            ToolArguments::Structured(map) => Some(map.clone()),
            ToolArguments::Raw(raw) => serde_json::from_str::<ArgMap>(raw).ok(),
        }
    }

    /// Re-encode a normalized map into the raw string representation
    /// used when echoing the invocation back into the history.
    pub fn raw_from_map(map: &ArgMap) -> Self {
        let encoded = serde_json::to_string(&Value::Object(map.clone()))
            .unwrap_or_else(|_| "{}".to_string());
        ToolArguments::Raw(encoded)
    }
}
