//! Task constructors.

pub mod terraform;

pub use terraform::TerraformModuleTask;
