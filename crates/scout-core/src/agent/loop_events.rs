//! Events emitted by the agent loop while a turn is in flight.
//!
//! Serialized with an internal `type` tag so consumers can dispatch on a
//! single field; every variant is self-contained and safe to forward
//! verbatim over a transport that frames JSON objects.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopEvent {
    /// Turn accepted, loop starting.
    Start,
    /// Human-readable progress line.
    Status { message: String },
    /// Model reasoning surfaced verbatim when the gateway exposes it.
    Thinking { message: String },
    /// A tool is about to run.
    ToolCall {
        tool_name: String,
        message: String,
    },
    /// A tool finished; `message` carries its (possibly truncated) output.
    Tool {
        tool_name: String,
        message: String,
    },
    /// A chunk of the final answer. `partial` is false on the last chunk.
    Content { message: String, partial: bool },
    /// Final answer in full, emitted exactly once on success.
    Complete { message: String },
    /// Fatal failure; the loop stops after this.
    Error { message: String },
    /// Always the last event of a turn.
    End,
}
