//! Preconfigured agents.

pub mod terraform;

pub use terraform::{terraform_architect, terraform_engineer};
