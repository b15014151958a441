//! Error types for terracrew.
//!
//! Three concerns, three enums: tool execution, LLM provider calls, and the
//! orchestration run that wraps both. The HTTP layer maps all of them to a
//! structured error payload rather than propagating a server error.

use thiserror::Error;

/// Errors raised by tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model supplied arguments the tool could not use.
    #[error("Invalid tool arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    /// Filesystem failure while the tool was writing output.
    #[error("Tool I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the LLM provider client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key available; a recognized configuration error, not a crash.
    #[error("LLM provider not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure talking to the provider.
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-retryable error status.
    #[error("LLM provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    /// The provider response could not be interpreted.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    /// Retries exhausted on transient failures (429 / 5xx).
    #[error("LLM call failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// Errors surfaced by an orchestration run.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The run ended without the model producing a final answer.
    #[error("Run did not complete: {0}")]
    Incomplete(String),
}
