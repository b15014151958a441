//! Shared utilities: error taxonomy and workspace path resolution.

pub mod errors;
pub mod paths;

pub use errors::{LlmError, OrchestrationError, ToolError};
pub use paths::workspace_root;
