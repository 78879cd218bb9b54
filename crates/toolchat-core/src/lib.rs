//! Toolchat Core
//!
//! Tool-calling conversation orchestrator: drives a multi-turn
//! dialogue with a chat backend, detects tool invocation requests,
//! dispatches them to locally registered handlers or to a remote
//! tool-provider process, injects the results back into the
//! conversation, and repeats until the model produces a final text
//! answer.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolchat_core::{
//!     Agent, ConsoleLogger, McpGateway, OllamaTransport, ProviderCommand, ToolRegistry,
//! };
//!
//! let logger = Arc::new(ConsoleLogger::new());
//! let transport = Arc::new(OllamaTransport::new("http://localhost:11434", logger.clone()));
//! let gateway = Arc::new(McpGateway::new(ProviderCommand::new("node"), logger.clone()));
//! let registry = Arc::new(ToolRegistry::with_builtins(logger.clone()));
//!
//! let mut agent = Agent::new(transport, gateway, registry, logger, "You are a helpful agent");
//! agent.setup().await?;
//! let answer = agent.run_turn("mistral:latest", "compute the lcm of 4 and 6").await?;
//! agent.cleanup().await;
//! ```

pub mod agent;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod tools;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use types::{
    ArgMap, ChatOutcome, FunctionCall, Message, Role, ToolArguments, ToolCallRecord, ToolSpec,
};

pub use logging::{ConsoleLogger, LogLevel, Logger, NoOpLogger};

pub use transport::{ChatOptions, ChatTransport, MockTransport, OllamaTransport, TransportError};

pub use gateway::{
    GatewayError, GatewayState, McpGateway, MockGateway, ProviderCommand, ToolGateway,
};

pub use tools::{
    CatalogEntry, LocalTool, ToolCatalog, ToolError, ToolOrigin, ToolRegistry, REMOTE_TOOL_PREFIX,
};

pub use agent::{unresolved_tool_message, Agent, DEFAULT_MAX_TOOL_TURNS};

pub use error::{AgentError, AgentResult};
