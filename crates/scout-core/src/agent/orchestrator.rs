//! The agent loop: the single canonical reason/act loop.
//!
//! `AgentLoop` owns one turn end to end: prompting the model, running the
//! tools it asks for, clipping outputs into the history, checkpointing the
//! session, and streaming the final answer out as events.
//!
//! Consumers are thin presentation layers:
//! - Build an `AgentLoop` from shared services
//! - Call `run()` with the user's message to get an event stream
//! - Map `LoopEvent` to their display or wire format
//!
//! ```text
//!  ┌────────────┐        LoopEvent         ┌─────────────┐
//!  │ AgentLoop  │ ─────────────────────►   │  Consumer   │
//!  │  (core)    │                          │ (CLI/Server)│
//!  └────────────┘                          └─────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::agent::bridge::{self, ChunkerConfig};
use crate::agent::context::ContextBudget;
use crate::agent::loop_events::LoopEvent;
use crate::agent::session::SessionState;
use crate::ai::gateway::ModelGateway;
use crate::ai::parser::parse_tool_markers;
use crate::ai::types::{Message, ModelResponse};
use crate::storage::CheckpointStore;
use crate::tools::registry::ToolRegistry;

const MAX_ITERATIONS: usize = 10;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a research assistant for exploring a company \
database. Answer from tool results, never from memory. When a question needs data, call the \
relevant tool; when you have enough to answer, reply in plain text with a concise, sourced \
summary. If a tool returns an error message, adjust your arguments and try again rather than \
giving up.";

/// Configuration for one loop instance. Everything has a sensible
/// default; callers usually only override the system prompt.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_iterations: usize,
    pub system_prompt: String,
    pub chunker: ChunkerConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            chunker: ChunkerConfig::default(),
        }
    }
}

/// Shared services the loop needs. All injected; the loop holds no
/// global state.
pub struct AgentServices {
    pub gateway: Arc<dyn ModelGateway>,
    pub registry: Arc<ToolRegistry>,
    pub budget: ContextBudget,
    pub checkpoints: Arc<dyn CheckpointStore>,
}

pub struct AgentLoop {
    services: AgentServices,
    config: LoopConfig,
}

impl AgentLoop {
    pub fn new(services: AgentServices, config: LoopConfig) -> Self {
        Self { services, config }
    }

    /// Start one turn.
    ///
    /// Returns the event receiver; the loop runs as a spawned tokio task
    /// and emits `LoopEvent`s for every state change, ending with `End`.
    /// Passing a known `session_id` resumes that session from its
    /// checkpoint; `None` starts a fresh one.
    pub fn run(
        self: Arc<Self>,
        session_id: Option<String>,
        user_text: String,
    ) -> mpsc::UnboundedReceiver<LoopEvent> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            self.run_inner(session_id, user_text, event_tx).await;
        });

        event_rx
    }

    async fn run_inner(
        self: Arc<Self>,
        session_id: Option<String>,
        user_text: String,
        event_tx: mpsc::UnboundedSender<LoopEvent>,
    ) {
        let mut state = match self.load_or_create(session_id) {
            Ok(state) => state,
            Err(e) => {
                let _ = event_tx.send(LoopEvent::Error {
                    message: format!("Failed to load session: {e}"),
                });
                let _ = event_tx.send(LoopEvent::End);
                return;
            }
        };

        state.history.push(Message::user(user_text));
        let _ = event_tx.send(LoopEvent::Start);
        let _ = event_tx.send(LoopEvent::Status {
            message: "Analyzing your request...".to_string(),
        });

        let descriptors = self.services.registry.descriptors();
        let mut final_text = String::new();

        for iteration in 1..=self.config.max_iterations {
            state.iteration_count = iteration;

            let report = self
                .services
                .budget
                .usage_report(&self.config.system_prompt, &state.history);
            tracing::debug!(
                session_id = %state.session_id,
                iteration,
                total_tokens = report.total,
                usage_percentage = report.usage_percentage,
                "calling model gateway"
            );

            let response = match self
                .services
                .gateway
                .generate(&state.history, &self.config.system_prompt, &descriptors)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    // A single bad turn must not kill the session. The
                    // error becomes the assistant's answer for this turn.
                    tracing::warn!(
                        session_id = %state.session_id,
                        iteration,
                        "model gateway failed: {e}"
                    );
                    final_text = format!(
                        "I encountered an error processing your request: {e}. \
                         Please try rephrasing your question."
                    );
                    state.history.push(Message::assistant(&final_text));
                    break;
                }
            };

            if let Some(thinking) = &response.thinking {
                let _ = event_tx.send(LoopEvent::Thinking {
                    message: thinking.clone(),
                });
            }

            let tool_calls = resolve_tool_calls(&response);

            if tool_calls.is_empty() {
                final_text = response.text.clone();
                state.history.push(
                    self.services
                        .budget
                        .clip_message(Message::assistant(&response.text)),
                );
                break;
            }

            state.history.push(self.services.budget.clip_message(
                Message::assistant_with_calls(&response.text, tool_calls.clone()),
            ));

            for call in &tool_calls {
                let _ = event_tx.send(LoopEvent::ToolCall {
                    tool_name: call.name.clone(),
                    message: format!("Running {}...", call.name),
                });
            }

            let outputs = self.services.registry.dispatch_batch(&tool_calls).await;

            for (call, output) in tool_calls.iter().zip(outputs) {
                let clipped = self
                    .services
                    .budget
                    .clip_message(Message::tool(&call.call_id, &call.name, output));
                let _ = event_tx.send(LoopEvent::Tool {
                    tool_name: call.name.clone(),
                    message: clipped.content.clone(),
                });
                state.history.push(clipped);
                state.tools_invoked.push(call.name.clone());
            }

            self.save_checkpoint(&state);

            if iteration == self.config.max_iterations {
                final_text = format!(
                    "I reached the maximum of {} reasoning turns before converging on a \
                     final answer. Here is what I gathered so far; please ask a more \
                     specific follow-up question to continue.",
                    self.config.max_iterations
                );
                state.history.push(Message::assistant(&final_text));
            }
        }

        bridge::stream_content(&event_tx, &final_text, &self.config.chunker).await;
        let _ = event_tx.send(LoopEvent::Complete {
            message: final_text,
        });

        self.save_checkpoint(&state);
        let _ = event_tx.send(LoopEvent::End);
    }

    fn load_or_create(&self, session_id: Option<String>) -> anyhow::Result<SessionState> {
        match session_id {
            Some(id) => match self.services.checkpoints.load(&id)? {
                Some(state) => Ok(state),
                None => Ok(SessionState::new(id)),
            },
            None => Ok(SessionState::new(uuid::Uuid::new_v4().to_string())),
        }
    }

    fn save_checkpoint(&self, state: &SessionState) {
        if let Err(e) = self.services.checkpoints.save(state) {
            tracing::error!(
                session_id = %state.session_id,
                "failed to save checkpoint: {e}"
            );
        }
    }
}

/// Tool calls for an iteration: the structured ones when present,
/// otherwise whatever `TOOL_CALL:` markers survive in the plain text.
/// Some backends emit the marker syntax instead of structured calls.
fn resolve_tool_calls(response: &ModelResponse) -> Vec<crate::ai::types::ToolCall> {
    if !response.tool_calls.is_empty() {
        return response.tool_calls.clone();
    }
    parse_tool_markers(&response.text)
}
