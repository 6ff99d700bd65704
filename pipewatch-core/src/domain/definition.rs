//! Static pipeline definition
//!
//! The definition fixes which steps exist, in which order, and which steps
//! gate the agent-execution and report sub-feeds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::step::{PipelineStep, StepStatus};
use crate::error::DefinitionError;

/// Static metadata for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl StepTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Ordered set of steps making up a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    steps: Vec<StepTemplate>,
    agent_step: String,
    report_step: String,
}

impl PipelineDefinition {
    /// Creates a validated definition
    ///
    /// # Arguments
    /// * `steps` - Step templates in execution order
    /// * `agent_step` - Id of the step whose progress activates the agent-execution feed
    /// * `report_step` - Id of the step whose progress activates the report feed
    pub fn new(
        steps: Vec<StepTemplate>,
        agent_step: impl Into<String>,
        report_step: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        if steps.is_empty() {
            return Err(DefinitionError::Empty);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(DefinitionError::DuplicateStep(step.id.clone()));
            }
        }

        let agent_step = agent_step.into();
        let report_step = report_step.into();
        for designated in [&agent_step, &report_step] {
            if !seen.contains(designated.as_str()) {
                return Err(DefinitionError::UnknownDesignatedStep(designated.clone()));
            }
        }

        Ok(Self {
            steps,
            agent_step,
            report_step,
        })
    }

    pub fn steps(&self) -> &[StepTemplate] {
        &self.steps
    }

    pub fn agent_step(&self) -> &str {
        &self.agent_step
    }

    pub fn report_step(&self) -> &str {
        &self.report_step
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.iter().any(|step| step.id == step_id)
    }

    /// Steps of a fresh execution, all pending
    pub fn initial_steps(&self) -> Vec<PipelineStep> {
        self.steps
            .iter()
            .map(|template| PipelineStep {
                id: template.id.clone(),
                name: template.name.clone(),
                description: template.description.clone(),
                status: StepStatus::Pending,
            })
            .collect()
    }
}

impl Default for PipelineDefinition {
    /// The seven-stage repair pipeline: clone, analyze, fix, test, deploy, review, report
    fn default() -> Self {
        let steps = vec![
            StepTemplate::new("clone", "Clone Repository", "Download source code"),
            StepTemplate::new("analyze", "AI Bug Analysis", "Scan the codebase for bugs"),
            StepTemplate::new("fix", "Auto-Fix Code", "Agent applies fixes"),
            StepTemplate::new("test", "Run CI/CD", "Run tests and build"),
            StepTemplate::new("deploy", "Deploy", "Deploy production build"),
            StepTemplate::new("review", "Code Review", "Automated review of the changes"),
            StepTemplate::new("report", "Generate Report", "Summarize the run"),
        ];

        Self {
            steps,
            agent_step: "fix".to_string(),
            report_step: "report".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_definition() {
        let definition = PipelineDefinition::default();
        let ids: Vec<&str> = definition.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["clone", "analyze", "fix", "test", "deploy", "review", "report"]
        );
        assert_eq!(definition.agent_step(), "fix");
        assert_eq!(definition.report_step(), "report");
    }

    #[test]
    fn test_default_definition_is_valid() {
        let definition = PipelineDefinition::default();
        let rebuilt = PipelineDefinition::new(
            definition.steps().to_vec(),
            definition.agent_step(),
            definition.report_step(),
        );
        assert_eq!(rebuilt, Ok(definition));
    }

    #[test]
    fn test_rejects_empty_definition() {
        let result = PipelineDefinition::new(vec![], "fix", "report");
        assert_eq!(result, Err(DefinitionError::Empty));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let steps = vec![
            StepTemplate::new("fix", "Fix", ""),
            StepTemplate::new("fix", "Fix again", ""),
        ];
        let result = PipelineDefinition::new(steps, "fix", "fix");
        assert_eq!(result, Err(DefinitionError::DuplicateStep("fix".to_string())));
    }

    #[test]
    fn test_rejects_unknown_designated_step() {
        let steps = vec![StepTemplate::new("fix", "Fix", "")];
        let result = PipelineDefinition::new(steps, "fix", "report");
        assert_eq!(
            result,
            Err(DefinitionError::UnknownDesignatedStep("report".to_string()))
        );
    }

    #[test]
    fn test_initial_steps_are_pending() {
        let steps = PipelineDefinition::default().initial_steps();
        assert_eq!(steps.len(), 7);
        assert!(steps.iter().all(|s| s.status == StepStatus::Pending));
    }
}
