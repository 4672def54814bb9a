//! Built-in tool implementations.
//!
//! Core tools:
//! - search_companies: find companies by query/industry
//! - analyze_company: detail view of one company with competitors
//! - get_company_statistics: directory-wide totals and breakdowns
//! - generate_report: draft a structured report via the pipeline

pub mod analyze;
pub mod report;
pub mod search;
pub mod statistics;

use std::sync::Arc;

pub use analyze::AnalyzeCompanyTool;
pub use report::GenerateReportTool;
pub use search::SearchCompaniesTool;
pub use statistics::CompanyStatisticsTool;

use crate::report::ReportPipeline;
use crate::tools::directory::CompanyDirectory;
use crate::tools::registry::ToolRegistry;

/// Register the full built-in tool set.
pub fn register_all_tools(
    registry: &mut ToolRegistry,
    directory: Arc<dyn CompanyDirectory>,
    pipeline: Arc<ReportPipeline>,
) {
    registry.register(Arc::new(SearchCompaniesTool::new(Arc::clone(&directory))));
    registry.register(Arc::new(AnalyzeCompanyTool::new(Arc::clone(&directory))));
    registry.register(Arc::new(GenerateReportTool::new(
        pipeline,
        Arc::clone(&directory),
    )));
    registry.register(Arc::new(CompanyStatisticsTool::new(directory)));
}
