//! Company search tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::directory::CompanyDirectory;
use crate::tools::registry::{Tool, ToolArgs, ToolError};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;
const DESCRIPTION_PREVIEW: usize = 100;

pub struct SearchCompaniesTool {
    directory: Arc<dyn CompanyDirectory>,
}

impl SearchCompaniesTool {
    pub fn new(directory: Arc<dyn CompanyDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for SearchCompaniesTool {
    fn name(&self) -> &str {
        "search_companies"
    }

    fn description(&self) -> &str {
        "Search for companies in the database by name, industry, description, or other \
         attributes. Use this when the question asks for companies matching some criteria. \
         Returns a formatted list of companies with their key information."
    }

    fn argument_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query (name, industry, description). Empty matches all."
                },
                "limit": {
                    "type": "string",
                    "description": "Maximum number of companies to return (default: 10)"
                },
                "industry": {
                    "type": "string",
                    "description": "Filter by industry (e.g. AI, Healthcare, FinTech)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let query = args.get("query").unwrap_or_default();
        let limit = args.get_usize("limit", DEFAULT_LIMIT)?.min(MAX_LIMIT);
        let industry = args.get("industry");

        let companies = self
            .directory
            .search(&query, limit, industry.as_deref())
            .await
            .map_err(|e| ToolError::Failed(format!("search failed: {e}")))?;

        if companies.is_empty() {
            let mut what = if query.is_empty() {
                "all companies".to_string()
            } else {
                format!("'{query}'")
            };
            if let Some(industry) = &industry {
                what.push_str(&format!(" in {industry}"));
            }
            return Ok(format!(
                "No companies found matching {what}. Try a different search term or industry."
            ));
        }

        let mut header = format!("Found {} companies", companies.len());
        if !query.is_empty() {
            header.push_str(&format!(" matching '{query}'"));
        }
        if let Some(industry) = &industry {
            header.push_str(&format!(" in {industry}"));
        }

        let mut out = format!("{header}:\n\n");
        for (idx, company) in companies.iter().enumerate() {
            out.push_str(&format!("{}. **{}**\n", idx + 1, company.name));
            out.push_str(&format!(
                "   - Industry: {}\n",
                company.industry.as_deref().unwrap_or("N/A")
            ));
            out.push_str(&format!(
                "   - Location: {}\n",
                company.location.as_deref().unwrap_or("N/A")
            ));
            let desc = company.description.as_deref().unwrap_or("N/A");
            out.push_str(&format!("   - Description: {}\n", preview(desc)));
            if let Some(batch) = &company.batch {
                out.push_str(&format!("   - Batch: {batch}\n"));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

fn preview(text: &str) -> String {
    if text.len() <= DESCRIPTION_PREVIEW {
        return text.to_string();
    }
    let mut cut = DESCRIPTION_PREVIEW;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::tests::FixtureDirectory;

    #[tokio::test]
    async fn lists_matches_with_key_fields() {
        let tool = SearchCompaniesTool::new(Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [("query".to_string(), "vector".to_string())]
                .into_iter()
                .collect(),
        );
        let out = tool.execute(args).await.unwrap();
        assert!(out.contains("Found 1 companies matching 'vector'"));
        assert!(out.contains("**Vectorly**"));
        assert!(out.contains("Industry: AI"));
    }

    #[tokio::test]
    async fn empty_result_suggests_retry() {
        let tool = SearchCompaniesTool::new(Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [
                ("query".to_string(), "zeppelin".to_string()),
                ("industry".to_string(), "Aviation".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        let out = tool.execute(args).await.unwrap();
        assert!(out.contains("No companies found matching 'zeppelin' in Aviation"));
    }

    #[tokio::test]
    async fn non_numeric_limit_is_rejected() {
        let tool = SearchCompaniesTool::new(Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [("limit".to_string(), "ten".to_string())]
                .into_iter()
                .collect(),
        );
        assert!(tool.execute(args).await.is_err());
    }
}
