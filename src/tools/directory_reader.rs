//! Directory-read tool.
//!
//! Lists the files under a workspace directory so the model can inspect what
//! a previous run (or the current one) has written before generating or
//! amending a module. Read-only counterpart to the module writer.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::utilities::errors::ToolError;

use super::base_tool::BaseTool;

/// Tool name advertised to the model.
pub const TOOL_NAME: &str = "read_directory";

/// Lists files under a directory in the workspace.
#[derive(Debug, Clone)]
pub struct DirectoryReadTool {
    /// Root directory the listing is confined to.
    pub workspace_root: PathBuf,
}

impl DirectoryReadTool {
    /// Create a reader rooted at the given workspace directory.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    fn collect(dir: &Path, prefix: &Path, files: &mut Vec<String>) -> Result<(), ToolError> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let relative = prefix.join(entry.file_name());
            if path.is_dir() {
                Self::collect(&path, &relative, files)?;
            } else {
                files.push(relative.display().to_string());
            }
        }
        Ok(())
    }
}

impl BaseTool for DirectoryReadTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "List all files under a directory in the workspace. Pass a relative \
         'directory' argument to list a subdirectory; omit it to list the \
         whole workspace."
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Workspace-relative directory to list; defaults to the workspace root"
                }
            },
            "required": []
        })
    }

    fn run(&self, args: HashMap<String, Value>) -> Result<String, ToolError> {
        let relative = args
            .get("directory")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ToolError::InvalidArguments {
                tool: TOOL_NAME.to_string(),
                message: "directory must stay inside the workspace".to_string(),
            });
        }

        let target = self.workspace_root.join(relative);
        if !target.is_dir() {
            return Ok(format!("Directory '{}' does not exist.", relative));
        }

        let mut files = Vec::new();
        Self::collect(&target, Path::new(""), &mut files)?;
        files.sort();

        if files.is_empty() {
            Ok(format!("Directory '{}' is empty.", relative))
        } else {
            Ok(format!(
                "Files in '{}':\n{}",
                relative,
                files.join("\n")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_files_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("m/sub")).unwrap();
        fs::write(dir.path().join("m/main.tf"), "a").unwrap();
        fs::write(dir.path().join("m/sub/outputs.tf"), "b").unwrap();

        let tool = DirectoryReadTool::new(dir.path());
        let mut args = HashMap::new();
        args.insert("directory".into(), Value::String("m".into()));

        let listing = tool.run(args).unwrap();
        assert!(listing.contains("main.tf"));
        assert!(listing.contains("sub/outputs.tf"));
        let main_pos = listing.find("main.tf").unwrap();
        let sub_pos = listing.find("sub/outputs.tf").unwrap();
        assert!(main_pos < sub_pos);
    }

    #[test]
    fn test_missing_directory_reports_text_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = DirectoryReadTool::new(dir.path());
        let mut args = HashMap::new();
        args.insert("directory".into(), Value::String("nope".into()));

        let listing = tool.run(args).unwrap();
        assert!(listing.contains("does not exist"));
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = DirectoryReadTool::new(dir.path());
        let mut args = HashMap::new();
        args.insert("directory".into(), Value::String("../outside".into()));

        let err = tool.run(args).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_default_lists_workspace_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("note.md"), "x").unwrap();

        let tool = DirectoryReadTool::new(dir.path());
        let listing = tool.run(HashMap::new()).unwrap();
        assert!(listing.contains("note.md"));
    }
}
