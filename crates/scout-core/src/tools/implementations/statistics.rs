//! Directory-wide statistics tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::directory::CompanyDirectory;
use crate::tools::registry::{Tool, ToolArgs, ToolError};

pub struct CompanyStatisticsTool {
    directory: Arc<dyn CompanyDirectory>,
}

impl CompanyStatisticsTool {
    pub fn new(directory: Arc<dyn CompanyDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for CompanyStatisticsTool {
    fn name(&self) -> &str {
        "get_company_statistics"
    }

    fn description(&self) -> &str {
        "Get overall statistics about the company database: total count, top industries, \
         and top locations. Use this for questions about the dataset as a whole."
    }

    fn argument_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, _args: ToolArgs) -> Result<String, ToolError> {
        let stats = self
            .directory
            .statistics()
            .await
            .map_err(|e| ToolError::Failed(format!("statistics unavailable: {e}")))?;

        let mut out = String::from("## Database Statistics\n\n");
        out.push_str(&format!(
            "**Total Companies:** {}\n\n",
            stats.total_companies
        ));

        if !stats.top_industries.is_empty() {
            out.push_str("**Top Industries:**\n");
            for (industry, count) in &stats.top_industries {
                out.push_str(&format!("- {industry}: {count} companies\n"));
            }
            out.push('\n');
        }

        if !stats.top_locations.is_empty() {
            out.push_str("**Top Locations:**\n");
            for (location, count) in &stats.top_locations {
                out.push_str(&format!("- {location}: {count} companies\n"));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::tests::FixtureDirectory;

    #[tokio::test]
    async fn formats_totals_and_breakdowns() {
        let tool = CompanyStatisticsTool::new(Arc::new(FixtureDirectory::seeded()));
        let out = tool.execute(ToolArgs::default()).await.unwrap();
        assert!(out.contains("**Total Companies:** 3"));
        assert!(out.contains("Top Industries"));
        assert!(out.contains("- AI: 2 companies"));
    }
}
