//! Chat transport trait definition

use async_trait::async_trait;

use crate::types::{ChatOutcome, Message, ToolSpec};

use super::error::TransportResult;

/// Options for a chat request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub num_predict: Option<u32>,
    /// Ask the backend for a streamed (line-per-chunk) reply; the
    /// decoder handles both shapes identically
    pub stream: bool,
}

impl ChatOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_num_predict(mut self, tokens: u32) -> Self {
        self.num_predict = Some(tokens);
        self
    }

    /// Request a streamed reply
    pub fn with_stream(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Transport to the chat backend
///
/// One call per logical exchange: the full history and the advertised
/// catalog go out, one [`ChatOutcome`] comes back. Implementations must
/// not panic across this boundary; failures are `Err` values and an
/// empty text outcome means "no answer obtained", never a valid answer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one exchange to the backend
    async fn send(
        &self,
        model: &str,
        history: &[Message],
        tools: &[ToolSpec],
        options: &ChatOptions,
    ) -> TransportResult<ChatOutcome>;

    /// Probe backend reachability; used by the agent's fail-fast setup
    async fn check_connection(&self) -> TransportResult<()>;
}
