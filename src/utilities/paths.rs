//! Workspace path resolution.
//!
//! Generated modules land under a single workspace root, one subdirectory per
//! run. The root is taken from `TERRAFORM_WORKSPACE` when set, otherwise
//! `workspace/` under the current directory.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the workspace root.
pub const WORKSPACE_ENV: &str = "TERRAFORM_WORKSPACE";

/// Resolve the workspace root directory, creating it if necessary.
pub fn workspace_root() -> PathBuf {
    let root = env::var(WORKSPACE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("workspace"));
    let _ = std::fs::create_dir_all(&root);
    root
}
