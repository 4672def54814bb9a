//! Context budget: keeps the transcript inside the model's window.
//!
//! Two jobs. First, per-message truncation: tool outputs are clipped to a
//! fixed ceiling before they enter the history, with a marker appended so
//! the model knows text was removed. Second, token accounting: a rough
//! estimate of how much of the window a prompt will consume, used for
//! telemetry rather than admission control.

use std::sync::Arc;

use serde::Serialize;

use crate::ai::types::{Message, Role};

/// Appended to every clipped message. Included inside the ceiling so a
/// truncated message is never longer than the limit it was clipped to.
pub const TRUNCATION_MARKER: &str =
    "\n\n[Output truncated to save context. Full result was shown above.]";

/// Optional exact tokenizer. When absent the budget falls back to a
/// chars/4 heuristic, which is close enough for telemetry.
pub trait TokenCounter: Send + Sync {
    /// Returns None when this counter cannot handle the text, in which
    /// case the caller falls back to the heuristic.
    fn count(&self, text: &str) -> Option<usize>;
}

#[derive(Debug, Clone)]
pub struct BudgetConfig {
    /// Character ceiling for a single tool message. Assistant messages
    /// get twice this.
    pub tool_output_ceiling: usize,
    /// Total window of the target model, in tokens.
    pub context_window: usize,
    /// Tokens held back for the model's own output.
    pub output_reserve: usize,
    /// Fraction of the remaining window treated as usable input.
    pub safety_margin: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            tool_output_ceiling: 3000,
            context_window: 200_000,
            output_reserve: 10_000,
            safety_margin: 0.85,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UsageReport {
    pub system_tokens: usize,
    pub message_tokens: usize,
    pub total: usize,
    pub max_input: usize,
    pub usage_percentage: f64,
}

#[derive(Clone)]
pub struct ContextBudget {
    config: BudgetConfig,
    counter: Option<Arc<dyn TokenCounter>>,
}

impl std::fmt::Debug for ContextBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBudget")
            .field("config", &self.config)
            .field("counter", &self.counter.is_some())
            .finish()
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl ContextBudget {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            counter: None,
        }
    }

    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Exact count when a tokenizer is wired in, chars/4 otherwise.
    pub fn estimate_tokens(&self, text: &str) -> usize {
        if let Some(counter) = &self.counter {
            if let Some(n) = counter.count(text) {
                return n;
            }
        }
        text.len() / 4
    }

    /// Clips `text` to `ceiling` characters including the marker. Already
    /// short text comes back unchanged, so the operation is idempotent.
    pub fn truncate(&self, text: &str, ceiling: usize) -> String {
        if text.len() <= ceiling {
            return text.to_string();
        }
        let keep = ceiling.saturating_sub(TRUNCATION_MARKER.len());
        let cut = floor_char_boundary(text, keep);
        let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
        out.push_str(&text[..cut]);
        out.push_str(TRUNCATION_MARKER);
        out
    }

    /// Ceiling for a message of the given role. Tool outputs get the base
    /// ceiling, assistant text twice that, everything else is untouched.
    pub fn ceiling_for(&self, role: Role) -> Option<usize> {
        match role {
            Role::Tool => Some(self.config.tool_output_ceiling),
            Role::Assistant => Some(self.config.tool_output_ceiling * 2),
            _ => None,
        }
    }

    /// Applies the per-role ceiling to a single message.
    pub fn clip_message(&self, mut message: Message) -> Message {
        if let Some(ceiling) = self.ceiling_for(message.role) {
            message.content = self.truncate(&message.content, ceiling);
        }
        message
    }

    /// Token telemetry for a prompt about to be sent.
    pub fn usage_report(&self, system_prompt: &str, history: &[Message]) -> UsageReport {
        let system_tokens = self.estimate_tokens(system_prompt);
        let message_tokens: usize = history
            .iter()
            .map(|m| self.estimate_tokens(&m.content))
            .sum();
        let total = system_tokens + message_tokens;
        let max_input = (self.config.context_window.saturating_sub(self.config.output_reserve)
            as f64
            * self.config.safety_margin) as usize;
        let usage_percentage = if max_input == 0 {
            0.0
        } else {
            total as f64 / max_input as f64 * 100.0
        };
        UsageReport {
            system_tokens,
            message_tokens,
            total,
            max_input,
            usage_percentage,
        }
    }
}

/// Largest byte index <= `index` that lands on a char boundary.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        let budget = ContextBudget::default();
        assert_eq!(budget.truncate("short", 3000), "short");
    }

    #[test]
    fn truncation_respects_ceiling_and_is_idempotent() {
        let budget = ContextBudget::default();
        let long = "x".repeat(10_000);
        let once = budget.truncate(&long, 3000);
        assert!(once.len() <= 3000);
        assert!(once.ends_with(TRUNCATION_MARKER));
        let twice = budget.truncate(&once, 3000);
        assert_eq!(once, twice);
    }

    #[test]
    fn truncation_never_splits_a_char() {
        let budget = ContextBudget::default();
        let long = "é".repeat(4000);
        let clipped = budget.truncate(&long, 3000);
        assert!(clipped.len() <= 3000);
        // Would panic on a broken boundary.
        let _ = clipped.chars().count();
    }

    #[test]
    fn oversized_tool_message_becomes_prefix_plus_marker() {
        let budget = ContextBudget::default();
        let original = "r".repeat(5000);
        let clipped = budget.clip_message(Message::tool("c1", "search_companies", &original));
        assert!(clipped.content.len() <= 3000 + TRUNCATION_MARKER.len());
        let body = clipped.content.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(original.starts_with(body));
    }

    #[test]
    fn assistant_gets_double_ceiling() {
        let budget = ContextBudget::default();
        assert_eq!(budget.ceiling_for(Role::Tool), Some(3000));
        assert_eq!(budget.ceiling_for(Role::Assistant), Some(6000));
        assert_eq!(budget.ceiling_for(Role::User), None);
    }

    #[test]
    fn heuristic_token_estimate() {
        let budget = ContextBudget::default();
        assert_eq!(budget.estimate_tokens("abcdefgh"), 2);
    }

    #[test]
    fn counter_overrides_heuristic() {
        struct Fixed;
        impl TokenCounter for Fixed {
            fn count(&self, _text: &str) -> Option<usize> {
                Some(42)
            }
        }
        let budget = ContextBudget::default().with_counter(Arc::new(Fixed));
        assert_eq!(budget.estimate_tokens("anything"), 42);
    }

    #[test]
    fn usage_report_math() {
        let budget = ContextBudget::new(BudgetConfig {
            context_window: 200_000,
            output_reserve: 10_000,
            safety_margin: 0.85,
            ..BudgetConfig::default()
        });
        let report = budget.usage_report("sys", &[Message::user("12345678")]);
        assert_eq!(report.max_input, 161_500);
        assert_eq!(report.message_tokens, 2);
        assert_eq!(report.total, report.system_tokens + report.message_tokens);
    }
}
