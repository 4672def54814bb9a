//! Report generation tool: exposes the pipeline to the agent loop.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::report::{ReportPipeline, ReportStatus, ReportType};
use crate::tools::directory::CompanyDirectory;
use crate::tools::registry::{Tool, ToolArgs, ToolError};

/// How many companies to pull as supporting data for the writer.
const SUPPORTING_COMPANIES: usize = 20;

pub struct GenerateReportTool {
    pipeline: Arc<ReportPipeline>,
    directory: Arc<dyn CompanyDirectory>,
}

impl GenerateReportTool {
    pub fn new(pipeline: Arc<ReportPipeline>, directory: Arc<dyn CompanyDirectory>) -> Self {
        Self {
            pipeline,
            directory,
        }
    }
}

#[async_trait]
impl Tool for GenerateReportTool {
    fn name(&self) -> &str {
        "generate_report"
    }

    fn description(&self) -> &str {
        "Draft a structured report on a topic, company, or industry. Report types: \
         comprehensive (full detail), executive (brief, for C-suite), detailed (deep \
         analysis), market_overview (market trends), competitive_analysis (competitive \
         landscape)."
    }

    fn argument_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Topic or company name for the report"
                },
                "report_type": {
                    "type": "string",
                    "description": "comprehensive, executive, detailed, market_overview, or competitive_analysis (default: comprehensive)"
                }
            },
            "required": ["topic"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let topic = args.require("topic")?;
        let report_type: ReportType = args
            .get("report_type")
            .unwrap_or_else(|| "comprehensive".to_string())
            .parse()
            .map_err(|e| ToolError::InvalidArguments(format!("{e}")))?;

        let supporting_data = self.gather_supporting_data(&topic).await;
        let output = self
            .pipeline
            .run_pipeline(&topic, report_type, &supporting_data)
            .await;

        match output.status {
            ReportStatus::Completed => {
                let degraded = output.sections.iter().filter(|s| s.degraded).count();
                let mut summary = format!(
                    "Report drafted successfully.\n\n- **Topic:** {topic}\n- **Type:** {report_type}\n- **Title:** {}\n- **Sections:** {}\n",
                    output.title,
                    output.sections.len(),
                );
                if degraded > 0 {
                    summary.push_str(&format!(
                        "- **Note:** {degraded} section(s) could not be generated and contain placeholders.\n"
                    ));
                }
                summary.push_str("\nSection headings:\n");
                for section in &output.sections {
                    summary.push_str(&format!("- {}\n", section.heading));
                }
                Ok(summary)
            }
            ReportStatus::Error => Ok(format!(
                "Report generation failed: {}",
                output
                    .error
                    .unwrap_or_else(|| "unknown error".to_string())
            )),
        }
    }
}

impl GenerateReportTool {
    async fn gather_supporting_data(&self, topic: &str) -> Vec<String> {
        match self.directory.search(topic, SUPPORTING_COMPANIES, None).await {
            Ok(companies) => companies
                .into_iter()
                .map(|c| {
                    format!(
                        "{} ({}, {}): {}",
                        c.name,
                        c.industry.as_deref().unwrap_or("N/A"),
                        c.location.as_deref().unwrap_or("N/A"),
                        c.description.as_deref().unwrap_or("no description")
                    )
                })
                .collect(),
            Err(e) => {
                tracing::warn!(topic, "supporting data lookup failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::ai::gateway::{GatewayError, ModelGateway};
    use crate::ai::types::{Message, ModelResponse, ToolDescriptor};
    use crate::tools::implementations::tests::FixtureDirectory;

    struct PlannerOnly;

    #[async_trait]
    impl ModelGateway for PlannerOnly {
        async fn generate(
            &self,
            history: &[Message],
            _system_prompt: &str,
            _tools: &[ToolDescriptor],
        ) -> Result<ModelResponse, GatewayError> {
            if history[0].content.contains("content planner") {
                Ok(ModelResponse::text_only(
                    r#"{"title": "T", "summary": "S", "sections": [{"heading": "Overview"}]}"#,
                ))
            } else {
                Ok(ModelResponse::text_only("# Overview\n\nBody."))
            }
        }
    }

    #[tokio::test]
    async fn summarizes_a_successful_draft() {
        let pipeline = Arc::new(ReportPipeline::new(Arc::new(PlannerOnly)));
        let tool = GenerateReportTool::new(pipeline, Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [
                ("topic".to_string(), "AI".to_string()),
                ("report_type".to_string(), "executive".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        let out = tool.execute(args).await.unwrap();
        assert!(out.contains("Report drafted successfully"));
        assert!(out.contains("- Overview"));
    }

    #[tokio::test]
    async fn rejects_unknown_report_type() {
        let pipeline = Arc::new(ReportPipeline::new(Arc::new(PlannerOnly)));
        let tool = GenerateReportTool::new(pipeline, Arc::new(FixtureDirectory::seeded()));
        let args = ToolArgs::new(
            [
                ("topic".to_string(), "AI".to_string()),
                ("report_type".to_string(), "quarterly".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        let err = tool.execute(args).await.unwrap_err();
        assert!(err.to_string().contains("quarterly"));
    }
}
