//! Tool abstractions and the Terraform module writer.
//!
//! A tool is a callable exposed to the model during a run; the orchestration
//! facade dispatches to it when the model asks. The only side-effecting tool
//! in this service writes a generated Terraform module to disk.

pub mod base_tool;
pub mod directory_reader;
pub mod terraform_writer;

pub use base_tool::{BaseTool, Tool, ToolFn};
pub use directory_reader::DirectoryReadTool;
pub use terraform_writer::TerraformModuleWriter;
