//! File-writer tool for generated Terraform modules.
//!
//! Given a module name and the four file contents, creates
//! `<workspace_root>/<module_name>` if absent and writes the fixed filenames
//! into it. No content validation, no atomicity across the four writes;
//! re-invocation with the same module name silently overwrites.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::utilities::errors::ToolError;

use super::base_tool::BaseTool;

/// Tool name advertised to the model.
pub const TOOL_NAME: &str = "write_terraform_module";

/// The four fixed filenames the tool writes, paired with their argument keys.
const FILES: [(&str, &str); 4] = [
    ("main_tf", "main.tf"),
    ("variables_tf", "variables.tf"),
    ("outputs_tf", "outputs.tf"),
    ("readme_md", "README.md"),
];

/// Writes a generated Terraform module into the workspace.
#[derive(Debug, Clone)]
pub struct TerraformModuleWriter {
    /// Root directory under which module subdirectories are created.
    pub workspace_root: PathBuf,
}

impl TerraformModuleWriter {
    /// Create a writer rooted at the given workspace directory.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    fn required_str<'a>(
        args: &'a HashMap<String, Value>,
        key: &str,
    ) -> Result<&'a str, ToolError> {
        args.get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: TOOL_NAME.to_string(),
                message: format!("missing string argument '{}'", key),
            })
    }
}

impl BaseTool for TerraformModuleWriter {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Write a Terraform module (main.tf, variables.tf, outputs.tf, README.md) \
         to a named directory in the workspace. Call this once with the complete \
         contents of all four files."
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "module_name": {
                    "type": "string",
                    "description": "Directory name for the module"
                },
                "main_tf": { "type": "string", "description": "Contents of main.tf" },
                "variables_tf": { "type": "string", "description": "Contents of variables.tf" },
                "outputs_tf": { "type": "string", "description": "Contents of outputs.tf" },
                "readme_md": { "type": "string", "description": "Contents of README.md" }
            },
            "required": ["module_name", "main_tf", "variables_tf", "outputs_tf", "readme_md"]
        })
    }

    fn run(&self, args: HashMap<String, Value>) -> Result<String, ToolError> {
        let module_name = Self::required_str(&args, "module_name")?;
        let base_path = self.workspace_root.join(module_name);
        fs::create_dir_all(&base_path)?;

        for (key, filename) in FILES {
            let content = Self::required_str(&args, key)?;
            fs::write(base_path.join(filename), content)?;
        }

        Ok(format!(
            "Terraform module written to {}",
            base_path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(module_name: &str) -> HashMap<String, Value> {
        let mut args = HashMap::new();
        args.insert("module_name".into(), Value::String(module_name.into()));
        args.insert("main_tf".into(), Value::String("resource {}".into()));
        args.insert("variables_tf".into(), Value::String("variable {}".into()));
        args.insert("outputs_tf".into(), Value::String("output {}".into()));
        args.insert("readme_md".into(), Value::String("# Module".into()));
        args
    }

    #[test]
    fn test_writes_four_files_with_matching_contents() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TerraformModuleWriter::new(dir.path());

        let confirmation = writer.run(args("m")).unwrap();
        assert!(confirmation.contains("m"));

        let base = dir.path().join("m");
        assert_eq!(fs::read_to_string(base.join("main.tf")).unwrap(), "resource {}");
        assert_eq!(fs::read_to_string(base.join("variables.tf")).unwrap(), "variable {}");
        assert_eq!(fs::read_to_string(base.join("outputs.tf")).unwrap(), "output {}");
        assert_eq!(fs::read_to_string(base.join("README.md")).unwrap(), "# Module");

        let count = fs::read_dir(&base).unwrap().count();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_reinvocation_overwrites_silently() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TerraformModuleWriter::new(dir.path());

        writer.run(args("m")).unwrap();
        let mut second = args("m");
        second.insert("main_tf".into(), Value::String("changed".into()));
        writer.run(second).unwrap();

        let content = fs::read_to_string(dir.path().join("m").join("main.tf")).unwrap();
        assert_eq!(content, "changed");
    }

    #[test]
    fn test_missing_argument_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TerraformModuleWriter::new(dir.path());

        let mut incomplete = args("m");
        incomplete.remove("outputs_tf");
        let err = writer.run(incomplete).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("outputs_tf"));
    }

    #[test]
    fn test_schema_requires_all_five_arguments() {
        let writer = TerraformModuleWriter::new("/tmp");
        let schema = writer.args_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
    }
}
