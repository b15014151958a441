//! Orchestration facade.
//!
//! [`Orchestrator`] is the seam the HTTP layer talks to: one agent, one task,
//! one final text result. [`Crew`] is the concrete run loop — it renders the
//! agent and task descriptors into a prompt, advertises the agent's tools to
//! the model, executes the tool calls the model requests, and loops until the
//! model produces a final answer or the iteration budget runs out.
//!
//! Each run is stateless; no memory is kept across requests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::Agent;
use crate::llm::{message, tool_message, ChatCompletion, Llm, LlmReply};
use crate::task::Task;
use crate::tools::base_tool::BaseTool;
use crate::utilities::errors::OrchestrationError;

/// Default cap on model/tool round trips per run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Runs one agent against one task and returns the final text.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn kickoff(&self, agent: &Agent, task: &Task) -> Result<String, OrchestrationError>;
}

/// The concrete orchestration run loop.
pub struct Crew {
    /// Tools available for dispatch, keyed by their advertised names.
    tools: Vec<Arc<dyn BaseTool>>,
    /// Cap on model/tool round trips per run.
    pub max_iterations: u32,
    /// Verbose mode for run logging.
    pub verbose: bool,
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("max_iterations", &self.max_iterations)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Crew {
    /// Create a crew with the given tool set.
    pub fn new(tools: Vec<Arc<dyn BaseTool>>) -> Self {
        Self {
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
        }
    }

    /// Builder method to set verbosity.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Function-calling schemas for the tools this agent is allowed to use.
    pub fn tool_schemas_for(&self, agent: &Agent) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .filter(|t| agent.tools.iter().any(|name| name == t.name()))
            .map(|t| t.to_function_schema())
            .collect()
    }

    fn tool_by_name(&self, name: &str) -> Option<&Arc<dyn BaseTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Run the loop against an explicit model.
    ///
    /// [`Orchestrator::kickoff`] calls this with the agent's configured
    /// [`Llm`]; tests drive it with a scripted model.
    pub async fn kickoff_with(
        &self,
        model: &dyn ChatCompletion,
        agent: &Agent,
        task: &Task,
    ) -> Result<String, OrchestrationError> {
        let schemas = self.tool_schemas_for(agent);

        let mut messages = vec![
            message("system", agent.system_prompt()),
            message("user", task.prompt()),
        ];

        for iteration in 0..self.max_iterations {
            if self.verbose {
                tracing::info!(role = %agent.role, iteration, "crew iteration");
            }

            let reply = model
                .complete(messages.clone(), Some(schemas.clone()))
                .await?;

            match reply {
                LlmReply::Text(text) => return Ok(text),
                LlmReply::ToolCalls { message: assistant, calls } => {
                    // The raw assistant message precedes its tool results.
                    messages.push(
                        serde_json::from_value(assistant)
                            .unwrap_or_else(|_| message("assistant", "")),
                    );

                    for call in calls {
                        let result = match self.tool_by_name(&call.name) {
                            Some(tool) => {
                                let tool = Arc::clone(tool);
                                let args = call.arguments.clone();
                                tokio::task::spawn_blocking(move || tool.run(args))
                                    .await
                                    .map_err(|e| {
                                        OrchestrationError::Incomplete(format!(
                                            "tool execution panicked: {}",
                                            e
                                        ))
                                    })?
                            }
                            None => {
                                tracing::warn!(tool = %call.name, "model requested unknown tool");
                                Ok(format!("Tool '{}' does not exist.", call.name))
                            }
                        };

                        // Tool failures go back to the model as text so it can
                        // correct itself; they are logged but not fatal.
                        let content = match result {
                            Ok(output) => output,
                            Err(e) => {
                                tracing::error!(tool = %call.name, error = %e, "tool failed");
                                format!("Tool '{}' failed: {}", call.name, e)
                            }
                        };
                        messages.push(tool_message(&call.id, content));
                    }
                }
            }
        }

        Err(OrchestrationError::Incomplete(format!(
            "no final answer after {} iterations",
            self.max_iterations
        )))
    }
}

#[async_trait]
impl Orchestrator for Crew {
    async fn kickoff(&self, agent: &Agent, task: &Task) -> Result<String, OrchestrationError> {
        let llm = agent.llm.clone().unwrap_or_else(Llm::default);
        self.kickoff_with(&llm, agent, task).await
    }
}
