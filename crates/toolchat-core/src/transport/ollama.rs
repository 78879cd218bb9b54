//! Ollama chat transport
//!
//! Speaks the Ollama HTTP protocol: `POST /api/chat` with the history
//! and tool catalog, `GET /api/tags` for reachability and model
//! enumeration. The chat reply body is newline-delimited JSON records;
//! the first line carrying a non-empty `message.tool_calls` list
//! short-circuits decoding, otherwise `message.content` fragments are
//! accumulated in order.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::logging::Logger;
use crate::types::{ChatOutcome, Message, ToolCallRecord, ToolSpec};

use super::error::{TransportError, TransportResult};
use super::traits::{ChatOptions, ChatTransport};

/// HTTP transport to an Ollama-compatible chat backend
#[derive(Clone)]
pub struct OllamaTransport {
    base_url: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
    logger: Arc<dyn Logger>,
}

/// One line of the chat reply body
#[derive(Debug, Deserialize)]
struct ChatLine {
    #[serde(default)]
    message: Option<LineMessage>,
}

#[derive(Debug, Deserialize)]
struct LineMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRecord>>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagsModel>,
}

#[derive(Debug, Deserialize)]
struct TagsModel {
    name: String,
}

impl OllamaTransport {
    /// Create a transport against the given base URL (e.g. `http://localhost:11434`)
    pub fn new(base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            bearer_token: None,
            client: reqwest::Client::new(),
            logger,
        }
    }

    /// Attach an opaque bearer credential; it is forwarded as an
    /// `Authorization` header and never inspected.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// List the model names the backend has available
    pub async fn list_models(&self) -> TransportResult<Vec<String>> {
        let response = self
            .authorized(self.client.get(self.endpoint("/api/tags")))
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::api_error(status.as_u16(), &body));
        }

        let tags: TagsResponse = serde_json::from_str(&body)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn build_body(
        &self,
        model: &str,
        history: &[Message],
        tools: &[ToolSpec],
        options: &ChatOptions,
    ) -> Value {
        let mut body = json!({
            "model": model,
            "messages": history,
            "stream": options.stream,
        });

        if !tools.is_empty() {
            let advertised: Vec<Value> = tools.iter().map(ToolSpec::to_request_value).collect();
            body["tools"] = Value::Array(advertised);
        }

        let mut extra = serde_json::Map::new();
        if let Some(temperature) = options.temperature {
            extra.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(num_predict) = options.num_predict {
            extra.insert("num_predict".to_string(), json!(num_predict));
        }
        if !extra.is_empty() {
            body["options"] = Value::Object(extra);
        }

        body
    }

    fn decode_body(&self, body: &str) -> ChatOutcome {
        let mut accumulated = String::new();

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parsed: ChatLine = match serde_json::from_str(line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    self.logger
                        .warn(&format!("[OllamaTransport] Skipping undecodable line: {e}"));
                    continue;
                }
            };

            let Some(message) = parsed.message else {
                continue;
            };

            if let Some(mut calls) = message.tool_calls {
                if !calls.is_empty() {
                    if calls.len() > 1 {
                        self.logger.warn(&format!(
                            "[OllamaTransport] {} simultaneous tool calls; only the first is processed",
                            calls.len()
                        ));
                    }
                    return ChatOutcome::ToolCall(calls.remove(0));
                }
            }

            if let Some(content) = message.content {
                accumulated.push_str(&content);
            }
        }

        ChatOutcome::Text(accumulated)
    }
}

#[async_trait]
impl ChatTransport for OllamaTransport {
    async fn send(
        &self,
        model: &str,
        history: &[Message],
        tools: &[ToolSpec],
        options: &ChatOptions,
    ) -> TransportResult<ChatOutcome> {
        let body = self.build_body(model, history, tools, options);

        self.logger.debug(&format!(
            "[OllamaTransport] Sending {} messages, {} tools to model {}",
            history.len(),
            tools.len(),
            model
        ));

        let response = self
            .authorized(self.client.post(self.endpoint("/api/chat")))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            self.logger.error(&format!(
                "[OllamaTransport] Chat request failed with status {status}"
            ));
            return Err(TransportError::api_error(status.as_u16(), &text));
        }

        Ok(self.decode_body(&text))
    }

    async fn check_connection(&self) -> TransportResult<()> {
        let response = self
            .authorized(self.client.get(self.endpoint("/api/tags")))
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::api_error(status.as_u16(), ""));
        }

        Ok(())
    }
}
