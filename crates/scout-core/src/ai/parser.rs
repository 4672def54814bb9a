//! Fallback tool-call extraction from free-form assistant text.
//!
//! Some backends ignore the structured tool-call channel and emit markers
//! like `TOOL_CALL: search_companies(query="fintech", limit="5")` inline.
//! This is a second, lower-priority extraction strategy: the loop tries it
//! only when the structured channel came back empty, and it sits behind
//! the same `(text) -> Vec<ToolCall>` shape so it can be swapped out
//! without touching the loop.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::ToolCall;

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"TOOL_CALL:\s*(\w+)\s*\(([^)]*)\)"#).expect("valid regex"));
static ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).expect("valid regex"));

/// Extract `TOOL_CALL:` markers from assistant text.
///
/// Synthesizes `call_id`s of the form `{name}_{index}` since the text
/// channel has none of its own. Returns an empty vec when no marker is
/// present, which the loop treats as a final answer.
pub fn parse_tool_markers(text: &str) -> Vec<ToolCall> {
    CALL_RE
        .captures_iter(text)
        .enumerate()
        .map(|(idx, cap)| {
            let name = cap[1].to_string();
            let mut arguments = BTreeMap::new();
            for arg in ARG_RE.captures_iter(&cap[2]) {
                arguments.insert(arg[1].to_string(), arg[2].to_string());
            }
            ToolCall {
                call_id: format!("{name}_{idx}"),
                name,
                arguments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_marker_with_arguments() {
        let calls = parse_tool_markers(
            r#"Let me look that up. TOOL_CALL: search_companies(query="fintech", limit="5")"#,
        );
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "search_companies");
        assert_eq!(calls[0].call_id, "search_companies_0");
        assert_eq!(calls[0].arguments.get("query").map(String::as_str), Some("fintech"));
        assert_eq!(calls[0].arguments.get("limit").map(String::as_str), Some("5"));
    }

    #[test]
    fn extracts_multiple_markers_in_order() {
        let text = r#"TOOL_CALL: analyze_company(company_name="Stripe")
TOOL_CALL: company_statistics()"#;
        let calls = parse_tool_markers(text);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "analyze_company");
        assert_eq!(calls[1].name, "company_statistics");
        assert!(calls[1].arguments.is_empty());
    }

    #[test]
    fn plain_text_yields_no_calls() {
        assert!(parse_tool_markers("Stripe is a payments company.").is_empty());
        assert!(parse_tool_markers("").is_empty());
    }

    #[test]
    fn tolerates_spacing_around_equals() {
        let calls = parse_tool_markers(r#"TOOL_CALL: search_companies( query = "ai" )"#);
        assert_eq!(calls[0].arguments.get("query").map(String::as_str), Some("ai"));
    }
}
