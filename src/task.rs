//! Task descriptor.
//!
//! A task pairs free-text instructions with an expected-output description
//! and the role of the agent responsible for it. Tasks are created per HTTP
//! request and discarded once the response is sent; there is no persistence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of work description handed to an agent for execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// Descriptive text detailing the task's purpose and execution.
    pub description: String,
    /// Clear definition of the expected task outcome.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    pub agent: Option<String>,
    /// Directory where the run's generated files are written, if any.
    pub output_dir: Option<PathBuf>,
}

impl Task {
    /// Create a new task with a description and expected output.
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: None,
            output_dir: None,
        }
    }

    /// Builder method to assign the task to an agent role.
    pub fn with_agent(mut self, role: impl Into<String>) -> Self {
        self.agent = Some(role.into());
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Render the user prompt for this task.
    pub fn prompt(&self) -> String {
        if self.expected_output.is_empty() {
            self.description.clone()
        } else {
            format!(
                "{}\n\nThis is the expected criteria for your final answer: {}",
                self.description, self.expected_output
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_construction() {
        let task = Task::new("Describe a bucket", "A bucket module")
            .with_agent("Terraform Architect")
            .with_output_dir("/tmp/out");

        assert_eq!(task.description, "Describe a bucket");
        assert_eq!(task.agent.as_deref(), Some("Terraform Architect"));
        assert_eq!(task.output_dir.as_deref(), Some(std::path::Path::new("/tmp/out")));
    }

    #[test]
    fn test_prompt_includes_expected_output() {
        let task = Task::new("do it", "done well");
        assert!(task.prompt().contains("do it"));
        assert!(task.prompt().contains("expected criteria"));
        assert!(task.prompt().contains("done well"));
    }

    #[test]
    fn test_prompt_without_expected_output() {
        let task = Task::new("do it", "");
        assert_eq!(task.prompt(), "do it");
    }
}
