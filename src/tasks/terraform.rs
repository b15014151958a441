//! Terraform module generation task.
//!
//! Builds the full requirements prompt for a module-generation run and
//! derives the run's output directory from a timestamp:
//! `<workspace_root>/terraform_modules/<module_type>_<YYYYMMDD_HHMMSS>`.
//!
//! The timestamp keeps concurrent requests from overwriting each other's
//! files. Granularity is one second; two requests landing in the same second
//! would share a directory. That window is accepted, not locked against.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::task::Task;

/// Directory under the workspace root collecting all generated modules.
pub const MODULES_SUBDIR: &str = "terraform_modules";

/// Constructor for Terraform module generation tasks.
pub struct TerraformModuleTask;

impl TerraformModuleTask {
    /// Build a task for the given request, timestamped with the current time.
    ///
    /// The output directory is created eagerly so the model's file writes
    /// cannot race directory creation.
    pub fn new(
        workspace_root: &Path,
        task_description: &str,
        module_type: &str,
        cloud_provider: &str,
    ) -> Task {
        Self::with_timestamp(
            workspace_root,
            task_description,
            module_type,
            cloud_provider,
            Local::now(),
        )
    }

    /// Build a task with an explicit timestamp.
    pub fn with_timestamp(
        workspace_root: &Path,
        task_description: &str,
        module_type: &str,
        cloud_provider: &str,
        timestamp: DateTime<Local>,
    ) -> Task {
        let output_dir = Self::output_dir_for(workspace_root, module_type, timestamp);
        if let Err(e) = fs::create_dir_all(&output_dir) {
            // Not fatal: the writer tool creates directories for its own
            // writes, and a run may not write files at all.
            tracing::warn!(
                dir = %output_dir.display(),
                error = %e,
                "failed to create output directory"
            );
        }

        let description = format!(
            "Generate a complete, production-ready Terraform module based on this request: {request}\n\
             \n\
             Requirements:\n\
             1. Create a modular, reusable Terraform configuration\n\
             2. Follow Terraform best practices and naming conventions\n\
             3. Include proper variable definitions with descriptions and types\n\
             4. Add comprehensive outputs for all important resource attributes\n\
             5. Include security best practices (encryption, access controls, etc.)\n\
             6. Generate clear documentation with usage examples\n\
             7. Use {provider} as the cloud provider\n\
             8. Save all files to: {dir}\n\
             \n\
             Required files to generate:\n\
             - main.tf: Core resource definitions\n\
             - variables.tf: Input variables with descriptions and validation\n\
             - outputs.tf: Output values for integration with other modules\n\
             - versions.tf: Provider version constraints\n\
             - README.md: Comprehensive documentation with examples\n\
             \n\
             Additional considerations:\n\
             - Use consistent naming conventions\n\
             - Add appropriate tags/labels for resource management\n\
             - Include data sources where appropriate\n\
             - Follow the principle of least privilege for security\n\
             - Make the module configurable but with sensible defaults",
            request = task_description,
            provider = cloud_provider,
            dir = output_dir.display(),
        );

        let expected_output = format!(
            "A complete Terraform module saved to {dir} containing:\n\
             1. main.tf - Well-structured resource definitions\n\
             2. variables.tf - Properly typed and documented variables\n\
             3. outputs.tf - Useful outputs for module consumers\n\
             4. versions.tf - Terraform and provider version requirements\n\
             5. README.md - Complete documentation with usage examples\n\
             \n\
             The module should be immediately usable and follow all Terraform \
             best practices.",
            dir = output_dir.display(),
        );

        Task::new(description, expected_output).with_output_dir(output_dir)
    }

    /// Derive the timestamped output directory for a run.
    pub fn output_dir_for(
        workspace_root: &Path,
        module_type: &str,
        timestamp: DateTime<Local>,
    ) -> PathBuf {
        let stamp = timestamp.format("%Y%m%d_%H%M%S");
        workspace_root
            .join(MODULES_SUBDIR)
            .join(format!("{}_{}", module_type, stamp))
    }
}
