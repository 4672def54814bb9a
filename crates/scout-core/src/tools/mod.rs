//! Tools: the registry plus the built-in capability set.

pub mod directory;
pub mod implementations;
pub mod registry;

pub use directory::{Company, CompanyAnalysis, CompanyDirectory, DirectoryStats};
pub use implementations::register_all_tools;
pub use registry::{Tool, ToolArgs, ToolError, ToolRegistry};
