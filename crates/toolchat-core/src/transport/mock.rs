//! Mock transport for testing
//!
//! Returns scripted outcomes without network dependencies and records
//! every request so tests can assert on the advertised catalog and the
//! history the agent sent.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::types::{ChatOutcome, FunctionCall, Message, ToolArguments, ToolCallRecord, ToolSpec};

use super::error::{TransportError, TransportResult};
use super::traits::{ChatOptions, ChatTransport};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    ToolCall(ToolCallRecord),
    Error(String),
}

/// A request the mock saw, captured for assertions
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub history: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Scripted chat transport for tests
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    unreachable: bool,
}

impl MockTransport {
    /// Create an empty mock; an exhausted script answers with an error
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose `check_connection` always fails
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Queue a text reply
    pub fn push_text(&self, text: impl Into<String>) {
        self.script.lock().push_back(MockReply::Text(text.into()));
    }

    /// Queue a tool invocation reply
    pub fn push_tool_call(&self, id: Option<&str>, name: &str, arguments: ToolArguments) {
        self.script.lock().push_back(MockReply::ToolCall(ToolCallRecord {
            id: id.map(str::to_string),
            function: FunctionCall {
                name: name.to_string(),
                arguments,
            },
        }));
    }

    /// Queue a transport failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.script.lock().push_back(MockReply::Error(message.into()));
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(
        &self,
        model: &str,
        history: &[Message],
        tools: &[ToolSpec],
        _options: &ChatOptions,
    ) -> TransportResult<ChatOutcome> {
        self.requests.lock().push(RecordedRequest {
            model: model.to_string(),
            history: history.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        match self.script.lock().pop_front() {
            Some(MockReply::Text(text)) => Ok(ChatOutcome::Text(text)),
            Some(MockReply::ToolCall(call)) => Ok(ChatOutcome::ToolCall(call)),
            Some(MockReply::Error(message)) => Err(TransportError::Unreachable(message)),
            None => Err(TransportError::Unreachable("mock script exhausted".to_string())),
        }
    }

    async fn check_connection(&self) -> TransportResult<()> {
        if self.unreachable {
            return Err(TransportError::Unreachable("mock is unreachable".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockTransport::new();
        mock.push_text("first");
        mock.push_tool_call(Some("x"), "f", ToolArguments::Raw("{}".to_string()));

        let history = vec![Message::user("hi")];
        let first = mock
            .send("m", &history, &[], &ChatOptions::new())
            .await
            .unwrap();
        assert_eq!(first.as_text(), Some("first"));

        let second = mock
            .send("m", &history, &[], &ChatOptions::new())
            .await
            .unwrap();
        assert_eq!(second.as_tool_call().unwrap().function.name, "f");

        // Exhausted script is a transport failure, not a panic
        assert!(mock
            .send("m", &history, &[], &ChatOptions::new())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let mock = MockTransport::new();
        mock.push_text("ok");

        let history = vec![Message::user("hi")];
        let tools = vec![ToolSpec::new("lcm", "lcm")];
        mock.send("mistral:latest", &history, &tools, &ChatOptions::new())
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "mistral:latest");
        assert_eq!(requests[0].tool_names, vec!["lcm"]);
        assert_eq!(requests[0].history.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_mock() {
        let mock = MockTransport::unreachable();
        assert!(mock.check_connection().await.is_err());
        assert!(MockTransport::new().check_connection().await.is_ok());
    }
}
