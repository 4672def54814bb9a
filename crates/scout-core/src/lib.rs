//! Scout core: the per-session control loop of a research assistant.
//!
//! The interesting machinery lives here: a bounded reason/act agent loop
//! (`AgentLoop`), a tool registry with uniform dispatch, a context budget
//! manager that keeps transcripts inside the model's input window, an
//! event stream bridge for incremental delivery, a checkpoint store for
//! session resumption, and a plan-then-generate report pipeline.
//!
//! Presentation layers (HTTP routes, UIs) and concrete data backends are
//! thin collaborators: they construct the services once at startup, call
//! [`AgentLoop::run`] or [`ReportPipeline::run_pipeline`], and consume
//! the resulting events.

pub mod agent;
pub mod ai;
pub mod report;
pub mod storage;
pub mod tools;

pub use agent::bridge::ChunkerConfig;
pub use agent::context::{BudgetConfig, ContextBudget, TokenCounter, UsageReport};
pub use agent::loop_events::LoopEvent;
pub use agent::orchestrator::{AgentLoop, AgentServices, LoopConfig, DEFAULT_SYSTEM_PROMPT};
pub use agent::session::SessionState;
pub use ai::gateway::{GatewayError, ModelGateway};
pub use ai::types::{Message, ModelResponse, Role, ToolCall, ToolDescriptor};
pub use report::{ReportOutput, ReportPipeline, ReportStatus, ReportType};
pub use storage::{CheckpointStore, MemoryCheckpointStore, SqliteCheckpointStore};
pub use tools::directory::CompanyDirectory;
pub use tools::registry::{Tool, ToolArgs, ToolError, ToolRegistry};
pub use tools::register_all_tools;
