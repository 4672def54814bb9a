//! Conversation and tool-call types
//!
//! These are the types the agent loop, the model gateway, and the tool
//! registry exchange. They are also what the checkpoint store persists,
//! so everything here round-trips through serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
///
/// `call_id` is unique within one assistant turn and pairs the eventual
/// tool result back to this request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    /// Arguments as a string-to-string mapping. BTreeMap keeps
    /// serialization deterministic for transcript comparisons.
    pub arguments: BTreeMap<String, String>,
}

/// One entry in a session transcript.
///
/// Invariants:
/// - a `tool` message always carries the `tool_call_id` of the request it
///   answers (and the `tool_name` for observability);
/// - an `assistant` message carrying `tool_calls` is not a final answer
///   until those calls resolve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    /// Assistant message that requests tool invocations.
    pub fn assistant_with_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
            tool_name: None,
        }
    }

    /// Tool result answering the request with the given `call_id`.
    pub fn tool(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
            tool_name: Some(tool_name.into()),
        }
    }
}

/// Tool definition handed to the model gateway alongside the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's arguments.
    pub argument_schema: Value,
}

/// Response from one generation call.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Assistant text. May be empty when the model only requests tools.
    pub text: String,
    /// Optional reasoning text, when the backend surfaces it.
    pub thinking: Option<String>,
    /// Tool invocations requested by the model, in request order.
    pub tool_calls: Vec<ToolCall>,
}

impl ModelResponse {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_message_carries_pairing_fields() {
        let msg = Message::tool("call-1", "search_companies", "3 results");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(msg.tool_name.as_deref(), Some("search_companies"));
    }

    #[test]
    fn message_serde_roundtrip_preserves_tool_calls() {
        let mut arguments = BTreeMap::new();
        arguments.insert("query".to_string(), "fintech".to_string());
        let msg = Message::assistant_with_calls(
            "",
            vec![ToolCall {
                call_id: "c1".into(),
                name: "search_companies".into(),
                arguments,
            }],
        );

        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn plain_messages_skip_empty_tool_fields() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }
}
