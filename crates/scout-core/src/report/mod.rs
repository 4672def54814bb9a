//! Plan-then-generate report drafting.
//!
//! A fixed three-stage pipeline: plan the section layout, generate each
//! section's prose, hand the drafted sections off. Compiling sections
//! into a document format is a downstream concern.

pub mod pipeline;
pub mod plan;

pub use pipeline::{ReportOutput, ReportPipeline, ReportSection, ReportStatus};
pub use plan::{PlanSection, ReportPlan, ReportType};
