//! Agent system for Scout
//!
//! ## Orchestrator (the canonical agent loop)
//! - `AgentLoop` - bounded reason/act state machine over a tool registry
//! - `LoopEvent` - event protocol between the loop and its consumers
//! - `LoopConfig` / `AgentServices` - configuration and dependencies
//!
//! ## Supporting pieces
//! - `ContextBudget` - token estimation and transcript truncation
//! - `SessionState` - the unit of persistence and mutation
//! - `bridge` - chunked delivery of final answers to the consumer

pub mod bridge;
pub mod context;
pub mod loop_events;
pub mod orchestrator;
pub mod session;

pub use bridge::ChunkerConfig;
pub use context::{BudgetConfig, ContextBudget, TokenCounter, UsageReport};
pub use loop_events::LoopEvent;
pub use orchestrator::{AgentLoop, AgentServices, LoopConfig};
pub use session::SessionState;
