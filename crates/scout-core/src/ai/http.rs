//! OpenAI-compatible HTTP gateway
//!
//! One concrete [`ModelGateway`] speaking the generic chat/completions
//! wire format, which most hosted and self-hosted backends accept. The
//! loop itself never sees any of this; it talks to the trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::gateway::{GatewayError, ModelGateway};
use super::types::{Message, ModelResponse, Role, ToolCall, ToolDescriptor};

/// Connection settings for an OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL without the `/v1/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
        }
    }
}

/// Non-streaming chat/completions client.
pub struct HttpGateway {
    config: HttpGatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_body(&self, history: &[Message], system_prompt: &str, tools: &[ToolDescriptor]) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": wire_messages(history, system_prompt),
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(
                tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.argument_schema,
                            }
                        })
                    })
                    .collect(),
            );
            body["tool_choice"] = Value::String("auto".to_string());
        }
        body
    }

    fn parse_response(body: &Value) -> Result<ModelResponse, GatewayError> {
        let message = body
            .pointer("/choices/0/message")
            .ok_or_else(|| GatewayError::Malformed("missing choices[0].message".to_string()))?;

        let text = message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
            for (idx, call) in calls.iter().enumerate() {
                let name = call
                    .pointer("/function/name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        GatewayError::Malformed(format!("tool_calls[{idx}] missing function.name"))
                    })?
                    .to_string();
                let call_id = call
                    .get("id")
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| format!("{name}_{idx}"));
                let raw_args = call
                    .pointer("/function/arguments")
                    .and_then(Value::as_str)
                    .unwrap_or("{}");
                let parsed: Value = serde_json::from_str(raw_args).map_err(|e| {
                    GatewayError::Malformed(format!("tool_calls[{idx}] arguments not JSON: {e}"))
                })?;

                let mut arguments = BTreeMap::new();
                if let Some(obj) = parsed.as_object() {
                    for (key, value) in obj {
                        let rendered = match value {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        arguments.insert(key.clone(), rendered);
                    }
                }

                tool_calls.push(ToolCall {
                    call_id,
                    name,
                    arguments,
                });
            }
        }

        Ok(ModelResponse {
            text,
            thinking: None,
            tool_calls,
        })
    }
}

/// Convert a transcript to the chat/completions message array.
///
/// The system instruction always leads; tool results become `role:"tool"`
/// entries paired by `tool_call_id`; assistant tool requests become the
/// `tool_calls` array with JSON-encoded arguments.
fn wire_messages(history: &[Message], system_prompt: &str) -> Vec<Value> {
    let mut out = vec![json!({"role": "system", "content": system_prompt})];

    for msg in history {
        match msg.role {
            Role::System => out.push(json!({"role": "system", "content": msg.content})),
            Role::User => out.push(json!({"role": "user", "content": msg.content})),
            Role::Assistant => {
                let mut wire = json!({"role": "assistant", "content": msg.content});
                if !msg.tool_calls.is_empty() {
                    wire["tool_calls"] = Value::Array(
                        msg.tool_calls
                            .iter()
                            .map(|call| {
                                json!({
                                    "id": call.call_id,
                                    "type": "function",
                                    "function": {
                                        "name": call.name,
                                        "arguments": serde_json::to_string(&call.arguments)
                                            .unwrap_or_else(|_| "{}".to_string()),
                                    }
                                })
                            })
                            .collect(),
                    );
                }
                out.push(wire);
            }
            Role::Tool => out.push(json!({
                "role": "tool",
                "tool_call_id": msg.tool_call_id.clone().unwrap_or_default(),
                "content": msg.content,
            })),
        }
    }

    out
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn generate(
        &self,
        history: &[Message],
        system_prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<ModelResponse, GatewayError> {
        let body = self.build_body(history, system_prompt, tools);
        debug!(model = %self.config.model, messages = history.len(), "sending generation request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Backend(format!("HTTP {status}: {detail}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;
        Self::parse_response(&payload)
    }
}
