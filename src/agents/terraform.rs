//! Preconfigured Terraform agents.
//!
//! Two production configurations: a module-builder architect with the writer
//! tool attached, and a senior engineer persona for review-heavy requests.
//! Both are plain [`Agent`] records; the prompts are the behavior.

use crate::agent::Agent;
use crate::llm::Llm;
use crate::tools::directory_reader::TOOL_NAME as READER_TOOL;
use crate::tools::terraform_writer::TOOL_NAME as WRITER_TOOL;

/// The "Terraform Architect" agent used for module generation runs.
///
/// Carries the module-writer tool so the model can persist its output.
pub fn terraform_architect(llm: Llm) -> Agent {
    Agent::new(
        "Terraform Architect",
        "Generate a production-ready Terraform module based on user input",
        "You are a DevOps engineer specializing in infrastructure-as-code \
         for scalable cloud environments.",
    )
    .with_tools(vec![WRITER_TOOL.to_string()])
    .with_llm(llm.with_temperature(0.2))
}

/// The "Senior DevOps Engineer & Terraform Expert" agent.
///
/// Carries the directory reader alongside the writer so it can review what
/// already exists in the workspace. Low temperature for consistent code
/// generation.
pub fn terraform_engineer(llm: Llm) -> Agent {
    Agent::new(
        "Senior DevOps Engineer & Terraform Expert",
        "Create production-ready, secure, and well-documented Terraform \
         modules following industry best practices",
        "You are a highly experienced DevOps engineer with 10+ years of \
         experience in cloud infrastructure and Infrastructure as Code. You \
         specialize in Terraform and have deep knowledge of AWS, Azure, and \
         GCP. You always follow security best practices, use proper naming \
         conventions, and create comprehensive documentation. You understand \
         the importance of modularity, reusability, and maintainability in \
         infrastructure code.",
    )
    .with_tools(vec![WRITER_TOOL.to_string(), READER_TOOL.to_string()])
    .with_llm(llm.with_temperature(0.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architect_carries_writer_tool() {
        let agent = terraform_architect(Llm::default());
        assert_eq!(agent.role, "Terraform Architect");
        assert!(agent.tools.contains(&WRITER_TOOL.to_string()));
        assert_eq!(agent.llm.as_ref().unwrap().temperature, Some(0.2));
    }

    #[test]
    fn test_engineer_carries_writer_and_reader_tools() {
        let agent = terraform_engineer(Llm::default());
        assert!(agent.tools.contains(&WRITER_TOOL.to_string()));
        assert!(agent.tools.contains(&READER_TOOL.to_string()));
        assert_eq!(agent.llm.as_ref().unwrap().temperature, Some(0.1));
        assert!(!agent.allow_delegation);
    }
}
