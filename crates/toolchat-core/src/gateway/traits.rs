//! Tool gateway trait definition

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::ToolSpec;

/// Connection lifecycle of a gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Errors at the tool-provider boundary
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gateway is not connected")]
    NotConnected,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    #[error("tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Session with an external tool-provider
///
/// State machine: Disconnected -> Connecting -> Connected ->
/// Disconnected. `connect` rolls back to Disconnected on any failure
/// and returns `Err`; callers decide whether remote tools are optional.
/// `list_tools` and `invoke` are only valid while Connected.
/// `disconnect` is idempotent and safe from any state.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Establish the provider session
    async fn connect(&self) -> GatewayResult<()>;

    /// Enumerate the provider's tools
    async fn list_tools(&self) -> GatewayResult<Vec<ToolSpec>>;

    /// Invoke a named tool and relay its result payload verbatim as text
    async fn invoke(&self, name: &str, arguments: Value) -> GatewayResult<String>;

    /// Tear the session down; never fails
    async fn disconnect(&self);

    /// Current lifecycle state
    fn state(&self) -> GatewayState;
}
