//! Agent descriptor.
//!
//! An agent is a static prompt configuration: a role, a goal, a backstory,
//! the tools it may use, and the language model that runs it. It carries no
//! behavior of its own; the orchestration facade reads it to build prompts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::Llm;

/// A named agent configuration supplied to the orchestration run.
///
/// Immutable once constructed. Owned by whichever task references it; there
/// is no shared mutation across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for the agent.
    pub id: Uuid,
    /// Role of the agent.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Backstory of the agent.
    pub backstory: String,
    /// Tools at the agent's disposal, by name.
    pub tools: Vec<String>,
    /// Language model that will run the agent.
    pub llm: Option<Llm>,
    /// Whether the agent may delegate to other agents.
    pub allow_delegation: bool,
    /// Verbose mode for the agent execution.
    pub verbose: bool,
}

impl Agent {
    /// Create a new agent with the given role, goal, and backstory.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            llm: None,
            allow_delegation: false,
            verbose: false,
        }
    }

    /// Builder method to attach tools by name.
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    /// Builder method to set the language model.
    pub fn with_llm(mut self, llm: Llm) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Builder method to allow delegation.
    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Builder method to set verbosity.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Render the system prompt for this agent's runs.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {role}. {backstory}\nYour personal goal is: {goal}",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal,
        )
    }
}
