//! The three-stage report pipeline: plan, generate, hand off.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::ai::gateway::ModelGateway;
use crate::ai::types::Message;
use crate::report::plan::{plan_prompt, PlanSection, ReportPlan, ReportType};

const PLANNER_SYSTEM_PROMPT: &str =
    "You are a report planning assistant. Respond with the requested JSON and nothing else.";

const WRITER_SYSTEM_PROMPT: &str = "You are a professional report writer. Write clear, \
data-driven prose in Markdown for the requested section only. Use the supplied data context \
for concrete numbers and examples; do not invent figures.";

/// How many supporting-data entries each section prompt gets.
const DATA_SLICE_PER_SECTION: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub content: String,
    pub sources: Vec<String>,
    pub focus_elements: Vec<String>,
    /// True when generation failed and `content` is a placeholder.
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportOutput {
    pub status: ReportStatus,
    pub title: String,
    pub summary: String,
    pub sections: Vec<ReportSection>,
    /// Diagnostic when `status` is `Error`.
    pub error: Option<String>,
}

impl ReportOutput {
    fn failed(error: String) -> Self {
        Self {
            status: ReportStatus::Error,
            title: String::new(),
            summary: String::new(),
            sections: Vec::new(),
            error: Some(error),
        }
    }
}

pub struct ReportPipeline {
    gateway: Arc<dyn ModelGateway>,
}

impl ReportPipeline {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Draft a full report. `supporting_data` is pre-formatted evidence
    /// (search results, statistics) sliced into each section prompt.
    ///
    /// A plan that cannot be obtained or parsed is a hard stop. A single
    /// section failing is not: that section degrades to a placeholder and
    /// the rest of the report survives.
    pub async fn run_pipeline(
        &self,
        topic: &str,
        report_type: ReportType,
        supporting_data: &[String],
    ) -> ReportOutput {
        let plan = match self.plan(topic, report_type).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!(topic, %report_type, "report planning failed: {e}");
                return ReportOutput::failed(format!("Report planning failed: {e}"));
            }
        };
        tracing::info!(
            topic,
            %report_type,
            sections = plan.sections.len(),
            "content table created"
        );

        let sections = join_all(plan.sections.iter().map(|section| {
            self.generate_section(topic, report_type, section, supporting_data)
        }))
        .await;

        ReportOutput {
            status: ReportStatus::Completed,
            title: plan.title,
            summary: plan.summary,
            sections,
            error: None,
        }
    }

    async fn plan(&self, topic: &str, report_type: ReportType) -> anyhow::Result<ReportPlan> {
        let history = [Message::user(plan_prompt(topic, report_type))];
        let response = self
            .gateway
            .generate(&history, PLANNER_SYSTEM_PROMPT, &[])
            .await?;
        Ok(ReportPlan::parse(&response.text)?)
    }

    async fn generate_section(
        &self,
        topic: &str,
        report_type: ReportType,
        section: &PlanSection,
        supporting_data: &[String],
    ) -> ReportSection {
        let prompt = section_prompt(topic, report_type, section, supporting_data);
        let history = [Message::user(prompt)];

        match self.gateway.generate(&history, WRITER_SYSTEM_PROMPT, &[]).await {
            Ok(response) => ReportSection {
                heading: section.heading.clone(),
                content: response.text,
                sources: section.sources.clone(),
                focus_elements: section.focus_elements.clone(),
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(heading = %section.heading, "section generation failed: {e}");
                ReportSection {
                    heading: section.heading.clone(),
                    content: format!("Error generating this section: {e}"),
                    sources: section.sources.clone(),
                    focus_elements: section.focus_elements.clone(),
                    degraded: true,
                }
            }
        }
    }
}

fn section_prompt(
    topic: &str,
    report_type: ReportType,
    section: &PlanSection,
    supporting_data: &[String],
) -> String {
    let focus = if section.focus_elements.is_empty() {
        "General analysis".to_string()
    } else {
        section.focus_elements.join(", ")
    };
    let notes = if section.notes.is_empty() {
        "None".to_string()
    } else {
        section.notes.join(", ")
    };
    let data_context = if supporting_data.is_empty() {
        "No additional data supplied.".to_string()
    } else {
        supporting_data
            .iter()
            .take(DATA_SLICE_PER_SECTION)
            .map(|entry| format!("- {entry}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Write the following report section.\n\n\
         **Section Heading:** {heading}\n\
         **Focus Elements:** {focus}\n\
         **Notes:** {notes}\n\
         **Topic:** {topic}\n\
         **Report Type:** {report_type}\n\n\
         DATA CONTEXT:\n{data_context}\n\n\
         Requirements:\n\
         1. Ground the prose in the data context above; use concrete numbers where present.\n\
         2. Format as Markdown with a top-level heading matching the section heading.\n\
         3. Keep it focused and suitable for a {report_type} report.",
        heading = section.heading,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::ai::gateway::GatewayError;
    use crate::ai::types::{ModelResponse, ToolDescriptor};

    const PLAN_JSON: &str = r#"{"title": "AI Market", "summary": "Overview.", "sections": [
        {"heading": "Executive Summary"},
        {"heading": "Market Landscape"},
        {"heading": "Outlook"}
    ]}"#;

    /// First call answers with the plan; later calls echo the section
    /// heading, or fail when the prompt names a poisoned heading.
    struct PipelineGateway {
        calls: AtomicUsize,
        poisoned_heading: Option<&'static str>,
    }

    impl PipelineGateway {
        fn new(poisoned_heading: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                poisoned_heading,
            }
        }
    }

    #[async_trait]
    impl ModelGateway for PipelineGateway {
        async fn generate(
            &self,
            history: &[Message],
            _system_prompt: &str,
            _tools: &[ToolDescriptor],
        ) -> Result<ModelResponse, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                return Ok(ModelResponse::text_only(PLAN_JSON));
            }
            let prompt = &history[0].content;
            if let Some(bad) = self.poisoned_heading {
                if prompt.contains(bad) {
                    return Err(GatewayError::Backend("writer offline".to_string()));
                }
            }
            let heading = prompt
                .lines()
                .find_map(|l| l.strip_prefix("**Section Heading:** "))
                .unwrap_or("?");
            Ok(ModelResponse::text_only(format!("# {heading}\n\nBody.")))
        }
    }

    /// Gateway whose planner answer is not parseable.
    struct BadPlanner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModelGateway for BadPlanner {
        async fn generate(
            &self,
            _history: &[Message],
            _system_prompt: &str,
            _tools: &[ToolDescriptor],
        ) -> Result<ModelResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ModelResponse::text_only("I would rather chat."))
        }
    }

    #[tokio::test]
    async fn sections_come_back_in_plan_order() {
        let pipeline = ReportPipeline::new(Arc::new(PipelineGateway::new(None)));
        let output = pipeline
            .run_pipeline("AI startups", ReportType::Comprehensive, &[])
            .await;

        assert_eq!(output.status, ReportStatus::Completed);
        assert_eq!(output.title, "AI Market");
        let headings: Vec<&str> = output.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Executive Summary", "Market Landscape", "Outlook"]
        );
        assert!(output.sections.iter().all(|s| !s.degraded));
    }

    #[tokio::test]
    async fn one_failed_section_degrades_to_a_placeholder() {
        let pipeline =
            ReportPipeline::new(Arc::new(PipelineGateway::new(Some("Market Landscape"))));
        let output = pipeline
            .run_pipeline("AI startups", ReportType::Executive, &[])
            .await;

        assert_eq!(output.status, ReportStatus::Completed);
        assert_eq!(output.sections.len(), 3);
        let bad = &output.sections[1];
        assert!(bad.degraded);
        assert!(bad.content.contains("Error generating this section"));
        assert!(!output.sections[0].degraded);
        assert!(!output.sections[2].degraded);
    }

    #[tokio::test]
    async fn unparseable_plan_stops_before_any_generation() {
        let gateway = Arc::new(BadPlanner {
            calls: AtomicUsize::new(0),
        });
        let pipeline = ReportPipeline::new(Arc::clone(&gateway) as Arc<dyn ModelGateway>);
        let output = pipeline
            .run_pipeline("AI startups", ReportType::Detailed, &[])
            .await;

        assert_eq!(output.status, ReportStatus::Error);
        assert!(output.sections.is_empty());
        assert!(output.error.unwrap().contains("Report planning failed"));
        // Only the planner call happened.
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn section_prompt_slices_supporting_data() {
        let section = PlanSection {
            heading: "Outlook".to_string(),
            sources: vec![],
            focus_elements: vec!["growth".to_string()],
            notes: vec![],
        };
        let data: Vec<String> = (0..30).map(|i| format!("entry {i}")).collect();
        let prompt = section_prompt("AI", ReportType::Comprehensive, &section, &data);
        assert!(prompt.contains("entry 19"));
        assert!(!prompt.contains("entry 20"));
        assert!(prompt.contains("**Focus Elements:** growth"));
    }
}
