//! Logical result of one chat exchange

use super::tool::ToolCallRecord;

/// What the model answered with: accumulated text, or a request to
/// invoke a tool. One invocation per exchange; the transport surfaces
/// only the first invocation of the first line that carries any.
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// Accumulated text content
    Text(String),
    /// Tool invocation request
    ToolCall(ToolCallRecord),
}

impl ChatOutcome {
    /// Check if this is a text outcome
    pub fn is_text(&self) -> bool {
        matches!(self, ChatOutcome::Text(_))
    }

    /// Check if this is a tool invocation outcome
    pub fn is_tool_call(&self) -> bool {
        matches!(self, ChatOutcome::ToolCall(_))
    }

    /// Get the text if this is a text outcome
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChatOutcome::Text(text) => Some(text),
            ChatOutcome::ToolCall(_) => None,
        }
    }

    /// Get the invocation if this is a tool invocation outcome
    pub fn as_tool_call(&self) -> Option<&ToolCallRecord> {
        match self {
            ChatOutcome::ToolCall(call) => Some(call),
            ChatOutcome::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tool::{FunctionCall, ToolArguments};

    #[test]
    fn test_outcome_accessors() {
        let text = ChatOutcome::Text("Hello".to_string());
        assert!(text.is_text());
        assert!(!text.is_tool_call());
        assert_eq!(text.as_text(), Some("Hello"));

        let call = ChatOutcome::ToolCall(ToolCallRecord {
            id: None,
            function: FunctionCall {
                name: "lcm".to_string(),
                arguments: ToolArguments::default(),
            },
        });
        assert!(call.is_tool_call());
        assert_eq!(call.as_tool_call().unwrap().function.name, "lcm");
    }
}
