//! Language model handle and provider client.
//!
//! Wraps an OpenAI-compatible chat-completions endpoint behind a small,
//! configuration-first struct. The API key defaults to the `OPENAI_API_KEY`
//! environment variable; its absence is a recognized configuration error
//! reported through [`LlmError::NotConfigured`], never a crash.
//!
//! Retry, timeout, and rate-limit handling for the provider call live here,
//! inside the orchestration boundary: transient failures (429, 5xx) are
//! retried with exponential backoff up to `max_retries`, everything else is
//! surfaced immediately.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::errors::LlmError;

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// A single message in an LLM conversation.
pub type LlmMessage = HashMap<String, Value>;

/// Build a `{role, content}` message.
pub fn message(role: &str, content: impl Into<String>) -> LlmMessage {
    let mut m = LlmMessage::new();
    m.insert("role".to_string(), Value::String(role.to_string()));
    m.insert("content".to_string(), Value::String(content.into()));
    m
}

/// Build a tool-result message answering a specific tool call.
pub fn tool_message(tool_call_id: &str, content: impl Into<String>) -> LlmMessage {
    let mut m = message("tool", content);
    m.insert(
        "tool_call_id".to_string(),
        Value::String(tool_call_id.to_string()),
    );
    m
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back in the tool-result message.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Parsed JSON arguments.
    pub arguments: HashMap<String, Value>,
}

/// Outcome of one completion call.
#[derive(Debug, Clone)]
pub enum LlmReply {
    /// Final text content.
    Text(String),
    /// The model requested tool invocations. `message` is the raw assistant
    /// message to append to the conversation before the tool results.
    ToolCalls {
        message: Value,
        calls: Vec<ToolCall>,
    },
}

/// Seam over the completion call.
///
/// The orchestration run loop talks to the model through this trait, so a
/// scripted implementation can drive the loop in tests the same way [`Llm`]
/// does in production.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<Value>>,
    ) -> Result<LlmReply, LlmError>;
}

/// Handle for an OpenAI-compatible chat model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Llm {
    /// Model name, e.g. "gpt-4".
    pub model: String,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// API key. Defaults from `OPENAI_API_KEY`; never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Custom base URL; defaults to the OpenAI API.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout: Option<f64>,
    /// Maximum number of retries on transient failures.
    pub max_retries: u32,
}

impl Default for Llm {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl Llm {
    /// Create a new handle for the given model, reading the API key from the
    /// environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: None,
            timeout: None,
            max_retries: 2,
        }
    }

    /// Builder method to set the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Builder method to set the API key explicitly.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder method to set a custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Whether a provider credential is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The API base URL.
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// Build the request body for the chat-completions API.
    pub fn build_request_body(&self, messages: &[LlmMessage], tools: Option<&[Value]>) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temp) = self.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = serde_json::json!(tools);
                body["tool_choice"] = serde_json::json!("auto");
            }
        }
        body
    }

    /// Call the chat-completions endpoint and parse the first choice.
    pub async fn acall(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<Value>>,
    ) -> Result<LlmReply, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::NotConfigured(
                    "OpenAI API key not set. Set the OPENAI_API_KEY environment variable."
                        .to_string(),
                )
            })?;

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "llm call"
        );

        let body = self.build_request_body(&messages, tools.as_deref());
        let endpoint = format!("{}/chat/completions", self.api_base_url());

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(timeout))
            .build()?;

        let mut last_error: Option<String> = None;
        let mut retry_delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::warn!(attempt, delay = ?retry_delay, "retrying llm call");
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", api_key))
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_error = Some("rate limited by provider (429)".to_string());
                continue;
            }
            if status.is_server_error() {
                last_error = Some(format!("provider server error: {}", status));
                continue;
            }

            let text = match response.text().await {
                Ok(t) => t,
                Err(e) => {
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            if status.is_client_error() {
                return Err(LlmError::Provider {
                    status: status.as_u16(),
                    body: text,
                });
            }

            let json: Value = serde_json::from_str(&text).map_err(|e| {
                LlmError::MalformedResponse(format!(
                    "{} - body: {}",
                    e,
                    truncate_on_char_boundary(&text, 500)
                ))
            })?;

            return parse_completions_response(&json);
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error: last_error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

#[async_trait]
impl ChatCompletion for Llm {
    async fn complete(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<Value>>,
    ) -> Result<LlmReply, LlmError> {
        self.acall(messages, tools).await
    }
}

/// Truncate `text` to at most `max` bytes without splitting a multi-byte
/// character.
fn truncate_on_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Parse a chat-completions response into text or tool calls.
fn parse_completions_response(response: &Value) -> Result<LlmReply, LlmError> {
    let message = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))?;

    if let Some(tool_calls) = message.get("tool_calls").and_then(|t| t.as_array()) {
        if !tool_calls.is_empty() {
            let mut calls = Vec::with_capacity(tool_calls.len());
            for call in tool_calls {
                let id = call
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let function = call.get("function").ok_or_else(|| {
                    LlmError::MalformedResponse("tool call without function".to_string())
                })?;
                let name = function
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let arguments = function
                    .get("arguments")
                    .and_then(|v| v.as_str())
                    .map(serde_json::from_str::<HashMap<String, Value>>)
                    .transpose()
                    .map_err(|e| {
                        LlmError::MalformedResponse(format!("bad tool arguments: {}", e))
                    })?
                    .unwrap_or_default();
                calls.push(ToolCall { id, name, arguments });
            }
            return Ok(LlmReply::ToolCalls {
                message: message.clone(),
                calls,
            });
        }
    }

    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .to_string();
    Ok(LlmReply::Text(content))
}
