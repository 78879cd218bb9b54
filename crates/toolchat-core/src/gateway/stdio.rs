//! MCP gateway over a spawned provider process
//!
//! Spawns the tool-provider with a given command and arguments and
//! speaks MCP over its standard streams using the official rmcp SDK.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    model::{CallToolRequestParams, ClientCapabilities, ClientInfo, Implementation, RawContent},
    service::RunningService,
    transport::TokioChildProcess,
    RoleClient, ServiceExt,
};
use serde_json::{json, Value};
use tokio::process::Command;

use crate::logging::Logger;
use crate::types::ToolSpec;

use super::traits::{GatewayError, GatewayResult, GatewayState, ToolGateway};

/// How to spawn the tool-provider process
#[derive(Debug, Clone)]
pub struct ProviderCommand {
    pub command: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl ProviderCommand {
    /// Create a command with no arguments
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Set the argument list
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Add an environment variable for the spawned process
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Gateway to an MCP tool-provider reached over spawned-process stdio
pub struct McpGateway {
    provider: ProviderCommand,
    service: tokio::sync::Mutex<Option<RunningService<RoleClient, ClientInfo>>>,
    state: parking_lot::Mutex<GatewayState>,
    logger: Arc<dyn Logger>,
}

impl McpGateway {
    /// Create a gateway; no process is spawned until `connect`
    pub fn new(provider: ProviderCommand, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider,
            service: tokio::sync::Mutex::new(None),
            state: parking_lot::Mutex::new(GatewayState::Disconnected),
            logger,
        }
    }

    async fn establish(&self) -> GatewayResult<RunningService<RoleClient, ClientInfo>> {
        let mut command = Command::new(&self.provider.command);
        command.args(&self.provider.args);
        for (key, value) in &self.provider.env {
            command.env(key, value);
        }

        let transport = TokioChildProcess::new(command)
            .map_err(|e| GatewayError::ConnectionFailed(e.to_string()))?;

        let client_info = ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "toolchat".to_string(),
                title: Some("Toolchat".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
        };

        client_info
            .serve(transport)
            .await
            .map_err(|e| GatewayError::InitializationFailed(e.to_string()))
    }

    fn spec_from_mcp(tool: rmcp::model::Tool) -> ToolSpec {
        ToolSpec {
            name: tool.name.to_string(),
            description: tool
                .description
                .map(|s| s.to_string())
                .unwrap_or_default(),
            parameters: serde_json::to_value(tool.input_schema.as_ref())
                .unwrap_or_else(|_| json!({ "type": "object" })),
        }
    }
}

#[async_trait]
impl ToolGateway for McpGateway {
    async fn connect(&self) -> GatewayResult<()> {
        {
            let mut state = self.state.lock();
            if *state == GatewayState::Connected {
                return Ok(());
            }
            *state = GatewayState::Connecting;
        }

        self.logger.info(&format!(
            "[McpGateway] Spawning tool-provider: {} {:?}",
            self.provider.command, self.provider.args
        ));

        match self.establish().await {
            Ok(service) => {
                *self.service.lock().await = Some(service);
                *self.state.lock() = GatewayState::Connected;
                self.logger
                    .info("[McpGateway] Connected and initialized successfully");
                Ok(())
            }
            Err(e) => {
                *self.state.lock() = GatewayState::Disconnected;
                self.logger
                    .warn(&format!("[McpGateway] Connection failed: {e}"));
                Err(e)
            }
        }
    }

    async fn list_tools(&self) -> GatewayResult<Vec<ToolSpec>> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or(GatewayError::NotConnected)?;

        let result = service
            .list_tools(Default::default())
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;

        self.logger
            .info(&format!("[McpGateway] Listed {} tools", result.tools.len()));

        Ok(result.tools.into_iter().map(Self::spec_from_mcp).collect())
    }

    async fn invoke(&self, name: &str, arguments: Value) -> GatewayResult<String> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or(GatewayError::NotConnected)?;

        self.logger
            .info(&format!("[McpGateway] Calling tool: {name}"));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = service
            .call_tool(params)
            .await
            .map_err(|e| GatewayError::ToolCallFailed(e.to_string()))?;

        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error.unwrap_or(false) {
            return Err(GatewayError::ToolCallFailed(text));
        }

        Ok(text)
    }

    async fn disconnect(&self) {
        let service = self.service.lock().await.take();
        if let Some(service) = service {
            if let Err(e) = service.cancel().await {
                self.logger
                    .warn(&format!("[McpGateway] Error during disconnect: {e}"));
            }
        }
        *self.state.lock() = GatewayState::Disconnected;
    }

    fn state(&self) -> GatewayState {
        *self.state.lock()
    }
}
