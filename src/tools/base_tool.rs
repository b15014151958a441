//! Base tool definitions.
//!
//! Provides the [`BaseTool`] trait and a concrete [`Tool`] that wraps a
//! callable function. The orchestration facade advertises each tool's name,
//! description, and JSON argument schema to the model, and dispatches the
//! model's tool calls through [`BaseTool::run`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::utilities::errors::ToolError;

/// Abstract base trait for tools exposed to the model.
pub trait BaseTool: Send + Sync + fmt::Debug {
    /// The unique name of the tool that clearly communicates its purpose.
    fn name(&self) -> &str;

    /// Description used to tell the model how/when/why to use the tool.
    fn description(&self) -> &str;

    /// JSON schema for the arguments that the tool accepts.
    fn args_schema(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }

    /// Execute the tool with the given arguments.
    fn run(&self, args: HashMap<String, Value>) -> Result<String, ToolError>;

    /// Function-calling schema entry for this tool, in the shape the
    /// chat-completions API expects.
    fn to_function_schema(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.args_schema(),
            }
        })
    }
}

/// Type alias for a boxed synchronous tool function.
pub type ToolFn = Arc<dyn Fn(HashMap<String, Value>) -> Result<String, ToolError> + Send + Sync>;

/// Concrete tool that wraps a callable function.
#[derive(Clone)]
pub struct Tool {
    tool_name: String,
    tool_description: String,
    tool_args_schema: Value,
    /// The wrapped function.
    pub func: ToolFn,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.tool_name)
            .field("description", &self.tool_description)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Create a new Tool wrapping the given function.
    pub fn new(name: impl Into<String>, description: impl Into<String>, func: ToolFn) -> Self {
        Self {
            tool_name: name.into(),
            tool_description: description.into(),
            tool_args_schema: Value::Object(serde_json::Map::new()),
            func,
        }
    }

    /// Builder method to set the args schema.
    pub fn with_args_schema(mut self, schema: Value) -> Self {
        self.tool_args_schema = schema;
        self
    }
}

impl BaseTool for Tool {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn description(&self) -> &str {
        &self.tool_description
    }

    fn args_schema(&self) -> Value {
        self.tool_args_schema.clone()
    }

    fn run(&self, args: HashMap<String, Value>) -> Result<String, ToolError> {
        (self.func)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_wraps_function() {
        let tool = Tool::new(
            "echo",
            "Echo the input back",
            Arc::new(|args| {
                let input = args
                    .get("input")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                Ok(format!("echo: {}", input))
            }),
        );

        let mut args = HashMap::new();
        args.insert("input".to_string(), Value::String("hi".to_string()));
        assert_eq!(tool.run(args).unwrap(), "echo: hi");
    }

    #[test]
    fn test_function_schema_shape() {
        let tool = Tool::new("t", "d", Arc::new(|_| Ok(String::new())))
            .with_args_schema(serde_json::json!({"type": "object"}));
        let schema = tool.to_function_schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "t");
        assert_eq!(schema["function"]["parameters"]["type"], "object");
    }
}
