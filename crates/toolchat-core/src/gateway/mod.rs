//! Remote tool gateway
//!
//! A session object wrapping the connection to an external
//! tool-provider process: connect, enumerate tools, invoke a named
//! tool, disconnect. The connection lives for the whole session; if it
//! cannot be established the orchestrator degrades to local tools only.

mod mock;
mod stdio;
mod traits;

pub use mock::MockGateway;
pub use stdio::{McpGateway, ProviderCommand};
pub use traits::{GatewayError, GatewayResult, GatewayState, ToolGateway};
