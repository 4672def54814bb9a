//! Company directory collaborator.
//!
//! The tools format text for the model; where that text comes from is
//! behind this trait. Production wires a real database-backed provider,
//! tests use an in-memory one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Accelerator batch label, when known.
    #[serde(default)]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyAnalysis {
    pub company: Company,
    pub competitors: Vec<Company>,
    pub insights: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DirectoryStats {
    pub total_companies: usize,
    /// (industry, company count), most common first.
    pub top_industries: Vec<(String, usize)>,
    /// (location, company count), most common first.
    pub top_locations: Vec<(String, usize)>,
}

#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        industry: Option<&str>,
    ) -> anyhow::Result<Vec<Company>>;

    /// None when the company is not in the directory.
    async fn analyze(
        &self,
        company_name: &str,
        include_competitors: bool,
    ) -> anyhow::Result<Option<CompanyAnalysis>>;

    async fn statistics(&self) -> anyhow::Result<DirectoryStats>;
}
