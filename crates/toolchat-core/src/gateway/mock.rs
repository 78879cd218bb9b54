//! Mock gateway for testing
//!
//! Serves a fixed tool list and canned replies, and records every
//! invocation so tests can assert on the provider-side tool name the
//! dispatcher used.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::types::ToolSpec;

use super::traits::{GatewayError, GatewayResult, GatewayState, ToolGateway};

/// Scripted tool gateway for tests
#[derive(Default)]
pub struct MockGateway {
    tools: Vec<ToolSpec>,
    replies: HashMap<String, String>,
    fail_connect: bool,
    state: Mutex<GatewayState>,
    invocations: Mutex<Vec<(String, Value)>>,
}

impl MockGateway {
    /// Create a gateway with no tools
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway whose `connect` always fails
    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    /// Serve a tool with a canned reply
    pub fn with_tool(mut self, spec: ToolSpec, reply: impl Into<String>) -> Self {
        self.replies.insert(spec.name.clone(), reply.into());
        self.tools.push(spec);
        self
    }

    /// All invocations seen so far, as (provider-side name, arguments)
    pub fn invocations(&self) -> Vec<(String, Value)> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl ToolGateway for MockGateway {
    async fn connect(&self) -> GatewayResult<()> {
        if self.fail_connect {
            *self.state.lock() = GatewayState::Disconnected;
            return Err(GatewayError::ConnectionFailed(
                "mock connect failure".to_string(),
            ));
        }
        *self.state.lock() = GatewayState::Connected;
        Ok(())
    }

    async fn list_tools(&self) -> GatewayResult<Vec<ToolSpec>> {
        if *self.state.lock() != GatewayState::Connected {
            return Err(GatewayError::NotConnected);
        }
        Ok(self.tools.clone())
    }

    async fn invoke(&self, name: &str, arguments: Value) -> GatewayResult<String> {
        if *self.state.lock() != GatewayState::Connected {
            return Err(GatewayError::NotConnected);
        }
        self.invocations
            .lock()
            .push((name.to_string(), arguments));
        match self.replies.get(name) {
            Some(reply) => Ok(reply.clone()),
            None => Err(GatewayError::ToolCallFailed(format!(
                "mock has no tool named '{name}'"
            ))),
        }
    }

    async fn disconnect(&self) {
        *self.state.lock() = GatewayState::Disconnected;
    }

    fn state(&self) -> GatewayState {
        *self.state.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_lifecycle_and_replies() {
        let gw = MockGateway::new().with_tool(ToolSpec::new("echo", "Echo"), "echoed");
        assert_eq!(gw.state(), GatewayState::Disconnected);
        assert!(matches!(
            gw.invoke("echo", json!({})).await,
            Err(GatewayError::NotConnected)
        ));

        gw.connect().await.unwrap();
        assert_eq!(gw.state(), GatewayState::Connected);
        assert_eq!(gw.list_tools().await.unwrap().len(), 1);
        assert_eq!(gw.invoke("echo", json!({"a": 1})).await.unwrap(), "echoed");
        assert_eq!(gw.invocations()[0].0, "echo");

        gw.disconnect().await;
        gw.disconnect().await;
        assert_eq!(gw.state(), GatewayState::Disconnected);
    }

    #[tokio::test]
    async fn test_failing_connect() {
        let gw = MockGateway::failing();
        assert!(gw.connect().await.is_err());
        assert_eq!(gw.state(), GatewayState::Disconnected);
    }
}
