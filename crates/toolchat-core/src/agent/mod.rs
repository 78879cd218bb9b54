//! Conversation orchestrator
//!
//! Owns the append-only history, composes the tool catalog, drives
//! chat exchanges, and executes the tool-processing loop: when the
//! model requests a tool, resolve it through the catalog's origin
//! tags, append the invocation and result messages, and ask again,
//! until a text answer arrives or the turn limit is hit.
//!
//! Everything is strictly sequential: one in-flight chat request, one
//! in-flight tool invocation, one mutator of the history.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AgentError, AgentResult};
use crate::gateway::ToolGateway;
use crate::logging::Logger;
use crate::tools::{ToolOrigin, ToolRegistry};
use crate::transport::{ChatOptions, ChatTransport, TransportResult};
use crate::types::{
    ArgMap, ChatOutcome, FunctionCall, Message, ToolArguments, ToolCallRecord, ToolSpec,
};

/// Default bound on tool rounds within one turn
pub const DEFAULT_MAX_TOOL_TURNS: usize = 10;

/// Result text injected when the model names a tool nobody serves
pub fn unresolved_tool_message(name: &str) -> String {
    format!("Tool '{name}' is not implemented")
}

/// The conversation orchestrator
pub struct Agent {
    transport: Arc<dyn ChatTransport>,
    gateway: Arc<dyn ToolGateway>,
    registry: Arc<ToolRegistry>,
    logger: Arc<dyn Logger>,
    /// Remote descriptors cached at setup; `None` is degraded
    /// local-tools-only mode
    remote_catalog: Option<Vec<ToolSpec>>,
    history: Vec<Message>,
    options: ChatOptions,
    max_tool_turns: usize,
}

impl Agent {
    /// Create an agent with a history seeded by one system message
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        gateway: Arc<dyn ToolGateway>,
        registry: Arc<ToolRegistry>,
        logger: Arc<dyn Logger>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            gateway,
            registry,
            logger,
            remote_catalog: None,
            history: vec![Message::system(system_prompt)],
            options: ChatOptions::default(),
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
        }
    }

    /// Override the tool-round bound
    pub fn with_max_tool_turns(mut self, max_tool_turns: usize) -> Self {
        self.max_tool_turns = max_tool_turns;
        self
    }

    /// Set chat options applied to every exchange
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the backend and attach the tool-provider.
    ///
    /// An unreachable backend fails fast. A failing provider degrades:
    /// the remote catalog stays `None` and the session continues with
    /// local tools only.
    pub async fn setup(&mut self) -> AgentResult<()> {
        self.transport
            .check_connection()
            .await
            .map_err(|e| AgentError::BackendUnreachable(e.to_string()))?;
        self.logger.info("[Agent] Chat backend reachable");

        self.remote_catalog = match self.gateway.connect().await {
            Ok(()) => match self.gateway.list_tools().await {
                Ok(tools) => {
                    self.logger.info(&format!(
                        "[Agent] Tool provider connected, {} tools discovered",
                        tools.len()
                    ));
                    Some(tools)
                }
                Err(e) => {
                    self.logger.warn(&format!(
                        "[Agent] Tool provider connected but listing failed: {e}; \
                         continuing with local tools only"
                    ));
                    self.gateway.disconnect().await;
                    None
                }
            },
            Err(e) => {
                self.logger.warn(&format!(
                    "[Agent] Tool provider unavailable: {e}; continuing with local tools only"
                ));
                None
            }
        };

        Ok(())
    }

    /// The catalog advertised on the next exchange
    pub fn catalog(&self) -> crate::tools::ToolCatalog {
        self.registry.catalog(self.remote_catalog.as_deref())
    }

    /// The conversation so far
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// One exchange with the backend. No recursion, no history
    /// mutation; the turn loop in [`Agent::run_turn`] owns both.
    pub async fn chat(&self, model: &str, history: &[Message]) -> TransportResult<ChatOutcome> {
        let specs = self.catalog().specs();
        self.transport
            .send(model, history, &specs, &self.options)
            .await
    }

    /// Run one user turn to completion: append the user message, let
    /// the model request tools (bounded), and return its final text.
    pub async fn run_turn(
        &mut self,
        model: &str,
        user_text: impl Into<String>,
    ) -> AgentResult<String> {
        self.history.push(Message::user(user_text));

        let mut outcome = self.exchange(model).await?;
        let mut rounds = 0usize;

        loop {
            match outcome {
                ChatOutcome::Text(text) => {
                    if text.is_empty() {
                        // No answer obtained, not a valid empty answer
                        return Err(AgentError::NoResponse);
                    }
                    self.history.push(Message::assistant(text.clone()));
                    return Ok(text);
                }
                ChatOutcome::ToolCall(call) => {
                    if rounds >= self.max_tool_turns {
                        self.logger.error(&format!(
                            "[Agent] Tool turn limit of {} exceeded, failing the turn",
                            self.max_tool_turns
                        ));
                        return Err(AgentError::TurnLimitExceeded {
                            limit: self.max_tool_turns,
                        });
                    }
                    rounds += 1;
                    outcome = self.process_tool_call(model, call).await?;
                }
            }
        }
    }

    /// Release the tool-provider connection; safe after any outcome
    pub async fn cleanup(&self) {
        self.gateway.disconnect().await;
    }

    async fn exchange(&self, model: &str) -> AgentResult<ChatOutcome> {
        self.chat(model, &self.history).await.map_err(|e| {
            self.logger
                .error(&format!("[Agent] Chat exchange failed: {e}"));
            AgentError::NoResponse
        })
    }

    /// One round of the tool-processing loop: normalize arguments,
    /// synthesize the correlation id, dispatch by origin tag, append
    /// the invocation and result messages, and ask the model again.
    async fn process_tool_call(
        &mut self,
        model: &str,
        call: ToolCallRecord,
    ) -> AgentResult<ChatOutcome> {
        let name = call.function.name.clone();

        let args = match call.function.arguments.normalize() {
            Some(map) => map,
            None => {
                self.logger.warn(&format!(
                    "[Agent] Could not decode arguments for '{name}', using empty arguments"
                ));
                ArgMap::new()
            }
        };

        // Derived from the history length, so ids stay distinct and
        // monotonic within one session
        let call_id = call
            .id
            .clone()
            .unwrap_or_else(|| format!("call_{}", self.history.len()));

        self.logger.info(&format!(
            "[Agent] Model requested tool '{name}' (id {call_id})"
        ));

        let result_text = self.dispatch(&name, &args).await;
        self.logger
            .debug(&format!("[Agent] Tool '{name}' result: {result_text}"));

        let record = ToolCallRecord {
            id: Some(call_id.clone()),
            function: FunctionCall {
                name: name.clone(),
                arguments: ToolArguments::raw_from_map(&args),
            },
        };
        self.history.push(Message::assistant_tool_call(record));
        self.history.push(Message::tool_result(call_id, name, result_text));

        self.exchange(model).await
    }

    /// Resolve a tool name to its origin and execute it. Failures of
    /// any kind become result text; the conversation always continues.
    async fn dispatch(&self, name: &str, args: &ArgMap) -> String {
        match self.catalog().resolve(name) {
            Some(ToolOrigin::Local) => match self.registry.call_local(name, args).await {
                Ok(text) => text,
                Err(e) => {
                    self.logger
                        .error(&format!("[Agent] Local tool '{name}' failed: {e}"));
                    format!("Error executing tool {name}: {e}")
                }
            },
            Some(ToolOrigin::Remote { name: provider_name }) => {
                let provider_name = provider_name.clone();
                match self
                    .gateway
                    .invoke(&provider_name, Value::Object(args.clone()))
                    .await
                {
                    Ok(text) => text,
                    Err(e) => {
                        self.logger.error(&format!(
                            "[Agent] Remote tool '{provider_name}' failed: {e}"
                        ));
                        format!("Error executing tool {provider_name}: {e}")
                    }
                }
            }
            None => {
                self.logger
                    .warn(&format!("[Agent] No handler resolves tool '{name}'"));
                unresolved_tool_message(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_tool_message() {
        assert_eq!(
            unresolved_tool_message("ghost"),
            "Tool 'ghost' is not implemented"
        );
    }
}
