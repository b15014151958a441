//! # terracrew
//!
//! An HTTP service that configures LLM-backed agents and tasks, hands them to
//! an orchestration facade, and writes the generated Terraform module files
//! to a timestamped workspace directory.
//!
//! The service exposes three endpoints (`GET /`, `GET /health`,
//! `POST /run-agent`); everything else is configuration records plus the
//! file-writer tool the model may invoke during a run.

pub mod agent;
pub mod agents;
pub mod crew;
pub mod llm;
pub mod server;
pub mod task;
pub mod tasks;
pub mod tools;
pub mod utilities;

pub use agent::Agent;
pub use crew::{Crew, Orchestrator};
pub use llm::Llm;
pub use task::Task;

/// Crate version, reported by the liveness endpoints.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
