//! Single-company analysis tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::directory::CompanyDirectory;
use crate::tools::registry::{Tool, ToolArgs, ToolError};

const COMPETITORS_SHOWN: usize = 5;

pub struct AnalyzeCompanyTool {
    directory: Arc<dyn CompanyDirectory>,
}

impl AnalyzeCompanyTool {
    pub fn new(directory: Arc<dyn CompanyDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for AnalyzeCompanyTool {
    fn name(&self) -> &str {
        "analyze_company"
    }

    fn description(&self) -> &str {
        "Perform a detailed analysis of one company: overview, competitive landscape, and \
         key insights. Use this when the question is about a specific company rather than a \
         list of companies."
    }

    fn argument_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": {
                    "type": "string",
                    "description": "Name of the company to analyze"
                },
                "include_competitors": {
                    "type": "string",
                    "description": "Whether to include competitor analysis: 'true' or 'false' (default: true)"
                }
            },
            "required": ["company_name"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let company_name = args.require("company_name")?;
        let include_competitors = args.get_bool("include_competitors", true)?;

        let analysis = self
            .directory
            .analyze(&company_name, include_competitors)
            .await
            .map_err(|e| ToolError::Failed(format!("analysis failed: {e}")))?;

        let Some(analysis) = analysis else {
            return Ok(format!(
                "Could not find or analyze company '{company_name}'. Please check the company name."
            ));
        };

        let mut out = format!("## Analysis of {company_name}\n\n");
        let company = &analysis.company;
        out.push_str("**Company Overview:**\n");
        out.push_str(&format!(
            "- Industry: {}\n",
            company.industry.as_deref().unwrap_or("N/A")
        ));
        out.push_str(&format!(
            "- Location: {}\n",
            company.location.as_deref().unwrap_or("N/A")
        ));
        out.push_str(&format!(
            "- Description: {}\n",
            company.description.as_deref().unwrap_or("N/A")
        ));
        if let Some(website) = &company.website {
            out.push_str(&format!("- Website: {website}\n"));
        }
        out.push('\n');

        if include_competitors && !analysis.competitors.is_empty() {
            out.push_str(&format!(
                "**Competitive Landscape ({} competitors found):**\n",
                analysis.competitors.len()
            ));
            for (idx, comp) in analysis.competitors.iter().take(COMPETITORS_SHOWN).enumerate() {
                out.push_str(&format!(
                    "{}. {} - {}\n",
                    idx + 1,
                    comp.name,
                    comp.industry.as_deref().unwrap_or("N/A")
                ));
            }
            out.push('\n');
        }

        if let Some(insights) = &analysis.insights {
            out.push_str(&format!("**Key Insights:**\n{insights}\n"));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::implementations::tests::FixtureDirectory;

    #[tokio::test]
    async fn known_company_gets_overview_and_competitors() {
        let tool = AnalyzeCompanyTool::new(Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [("company_name".to_string(), "Vectorly".to_string())]
                .into_iter()
                .collect(),
        );
        let out = tool.execute(args).await.unwrap();
        assert!(out.contains("## Analysis of Vectorly"));
        assert!(out.contains("Competitive Landscape"));
    }

    #[tokio::test]
    async fn unknown_company_is_a_correctable_answer() {
        let tool = AnalyzeCompanyTool::new(Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [("company_name".to_string(), "Ghost Corp".to_string())]
                .into_iter()
                .collect(),
        );
        let out = tool.execute(args).await.unwrap();
        assert!(out.contains("Could not find or analyze company 'Ghost Corp'"));
    }

    #[tokio::test]
    async fn missing_name_is_an_argument_error() {
        let tool = AnalyzeCompanyTool::new(Arc::new(FixtureDirectory::seeded()));
        let err = tool.execute(ToolArgs::default()).await.unwrap_err();
        assert!(err.to_string().contains("company_name"));
    }
}
