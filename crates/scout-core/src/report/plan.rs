//! Report plan: the structured content table the model is asked for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Comprehensive,
    Executive,
    Detailed,
    MarketOverview,
    CompetitiveAnalysis,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Executive => "executive",
            Self::Detailed => "detailed",
            Self::MarketOverview => "market_overview",
            Self::CompetitiveAnalysis => "competitive_analysis",
        }
    }

    /// Planner guidance shown per type.
    fn guidance(&self) -> &'static str {
        match self {
            Self::Comprehensive => "Full detailed report with all sections",
            Self::Executive => "Brief executive summary for C-suite (3-5 sections max)",
            Self::Detailed => "Deep analytical report with extensive data (8-12 sections)",
            Self::MarketOverview => "Market-level insights and trends (5-7 sections)",
            Self::CompetitiveAnalysis => "Focus on competitive landscape (6-8 sections)",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comprehensive" => Ok(Self::Comprehensive),
            "executive" => Ok(Self::Executive),
            "detailed" => Ok(Self::Detailed),
            "market_overview" => Ok(Self::MarketOverview),
            "competitive_analysis" => Ok(Self::CompetitiveAnalysis),
            other => Err(PlanError::UnknownReportType(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unknown report type '{0}'")]
    UnknownReportType(String),
    #[error("planner output contains no JSON object")]
    NoJson,
    #[error("planner output is not a valid plan: {0}")]
    InvalidPlan(#[from] serde_json::Error),
    #[error("plan has no sections")]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSection {
    pub heading: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub focus_elements: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub sections: Vec<PlanSection>,
}

impl ReportPlan {
    /// Pulls the plan out of raw model text. The model is told to answer
    /// with JSON only, but chatter around the object is tolerated by
    /// scanning for the outermost braces.
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let start = text.find('{').ok_or(PlanError::NoJson)?;
        let end = text.rfind('}').ok_or(PlanError::NoJson)?;
        if end < start {
            return Err(PlanError::NoJson);
        }
        let plan: Self = serde_json::from_str(&text[start..=end])?;
        if plan.sections.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(plan)
    }
}

/// Prompt asking the model for a structured content table.
pub fn plan_prompt(topic: &str, report_type: ReportType) -> String {
    format!(
        "You are an expert report content planner. Create a structured content table for a \
         {report_type} report on the topic: {topic}.\n\n\
         Report type guidance: {guidance}\n\n\
         Output format (JSON only):\n\
         {{\n\
         \x20 \"title\": \"Report Title\",\n\
         \x20 \"summary\": \"One-paragraph summary of the report\",\n\
         \x20 \"sections\": [\n\
         \x20   {{\n\
         \x20     \"heading\": \"Section Heading\",\n\
         \x20     \"sources\": [\"data_source_1\", \"data_source_2\"],\n\
         \x20     \"focus_elements\": [\"element1\", \"element2\"],\n\
         \x20     \"notes\": [\"note1\", \"note2\"]\n\
         \x20   }}\n\
         \x20 ]\n\
         }}\n\n\
         Return ONLY valid JSON, no additional text.",
        guidance = report_type.guidance(),
    )
}
