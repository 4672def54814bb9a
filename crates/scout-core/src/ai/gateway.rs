//! Model gateway contract
//!
//! The agent loop and the report pipeline are agnostic to which backend
//! generates text; they only consume this trait. Implementations adapt a
//! concrete provider (see [`super::http::HttpGateway`]) or script
//! responses for tests.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{Message, ModelResponse, ToolDescriptor};

/// Failures from the generation backend.
///
/// These are always fail-soft at the loop level: a gateway error becomes a
/// user-visible assistant message, never a crashed session.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend request itself failed (network, HTTP status, timeout).
    #[error("generation backend request failed: {0}")]
    Backend(String),

    /// The backend answered but the payload did not match the expected shape.
    #[error("generation backend returned malformed output: {0}")]
    Malformed(String),
}

/// Uniform interface to a text-generation backend.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Submit the (already truncated) history plus a system instruction and
    /// the available tool descriptors. Returns assistant text and zero or
    /// more requested tool invocations.
    async fn generate(
        &self,
        history: &[Message],
        system_prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<ModelResponse, GatewayError>;
}
