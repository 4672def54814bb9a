//! Session state: the unit of persistence and mutation.
//!
//! Created on the first user message, mutated once per loop iteration,
//! and serialized as-is into the checkpoint store. Messages and tool
//! calls are owned exclusively by the session that contains them.

use serde::{Deserialize, Serialize};

use crate::ai::types::Message;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    /// Opaque identifier, stable for the conversation's lifetime.
    pub session_id: String,
    /// Ordered transcript. Append-only; oversized tool and assistant
    /// messages are clipped to the context budget before they are
    /// appended, so the stored history is already within ceiling.
    pub history: Vec<Message>,
    /// Incremented once per reason/act pass. Never exceeds the loop's
    /// iteration ceiling.
    pub iteration_count: usize,
    /// Names of tools invoked so far, append-only, for observability.
    #[serde(default)]
    pub tools_invoked: Vec<String>,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }
}
