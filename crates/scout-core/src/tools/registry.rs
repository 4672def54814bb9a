//! Tool registry: the fixed set of callable capabilities.
//!
//! Every capability, however it is implemented underneath, is adapted to
//! one calling convention here: `execute(args) -> text`. The registry is
//! built once at startup and read-only afterwards, so it is safe to share
//! across tasks without locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;

use crate::ai::types::{ToolCall, ToolDescriptor};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Failed(String),
}

/// String-keyed arguments as the model supplies them. Typed accessors
/// fail with `InvalidArguments`, which flows back to the model as a
/// correctable message rather than an abort.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs(BTreeMap<String, String>);

impl ToolArgs {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    pub fn require(&self, key: &str) -> Result<String, ToolError> {
        self.get(key)
            .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument '{key}'")))
    }

    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize, ToolError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                ToolError::InvalidArguments(format!("argument '{key}' must be an integer, got '{raw}'"))
            }),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ToolError> {
        match self.0.get(key).map(String::as_str) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(raw) => Err(ToolError::InvalidArguments(format!(
                "argument '{key}' must be 'true' or 'false', got '{raw}'"
            ))),
        }
    }
}

impl From<BTreeMap<String, String>> for ToolArgs {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Trait for tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (unique key in the registry).
    fn name(&self) -> &str;

    /// Purpose description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema for the arguments.
    fn argument_schema(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError>;
}

/// Name-to-tool mapping, fixed after construction.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    // Registration order, so descriptors and listings are stable.
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Descriptors for the model, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                argument_schema: tool.argument_schema(),
            })
            .collect()
    }

    /// Run one call. Unknown names and execution failures both come back
    /// as text the model can act on; nothing here is fatal.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.get(&call.name) else {
            tracing::warn!(tool = %call.name, "unknown tool requested");
            return format!(
                "Tool '{}' is not available. Available tools: [{}]",
                call.name,
                self.order.join(", ")
            );
        };

        tracing::info!(tool = %call.name, call_id = %call.call_id, "dispatching tool");
        match tool.execute(ToolArgs::new(call.arguments.clone())).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = %call.name, "tool failed: {e}");
                format!("Tool '{}' failed: {e}", call.name)
            }
        }
    }

    /// Run a batch concurrently. Outputs come back in request order no
    /// matter which call finishes first.
    pub async fn dispatch_batch(&self, calls: &[ToolCall]) -> Vec<String> {
        join_all(calls.iter().map(|call| self.dispatch(call))).await
    }
}
