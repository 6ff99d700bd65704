//! Pipeline execution domain type

use serde::{Deserialize, Serialize};

use super::definition::PipelineDefinition;
use super::step::{PipelineStep, StepStatus};
use super::subfeed::SubFeedState;

/// One run of the whole pipeline, as observed by the client
///
/// Values of this type are only ever replaced wholesale; comparing the
/// previous and next value is enough for change detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineExecution {
    /// Assigned by the backend; unknown until the run has been accepted
    pub execution_id: Option<String>,
    pub repo_url: String,
    /// True until the backend reports the run as finished
    pub is_active: bool,
    pub steps: Vec<PipelineStep>,
    pub agent_execution: SubFeedState,
    pub report: SubFeedState,
}

impl PipelineExecution {
    /// Creates a fresh execution with every step pending
    pub fn new(
        definition: &PipelineDefinition,
        repo_url: impl Into<String>,
        execution_id: Option<String>,
    ) -> Self {
        Self {
            execution_id,
            repo_url: repo_url.into(),
            is_active: true,
            steps: definition.initial_steps(),
            agent_execution: SubFeedState::not_started(),
            report: SubFeedState::not_started(),
        }
    }

    pub fn step(&self, step_id: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn step_status(&self, step_id: &str) -> Option<StepStatus> {
        self.step(step_id).map(|step| step.status)
    }

    pub fn with_execution_id(mut self, execution_id: Option<String>) -> Self {
        self.execution_id = execution_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subfeed::SubFeedStatus;

    #[test]
    fn test_new_execution() {
        let definition = PipelineDefinition::default();
        let execution = PipelineExecution::new(&definition, "https://example/repo", None);

        assert!(execution.is_active);
        assert!(execution.execution_id.is_none());
        assert_eq!(execution.repo_url, "https://example/repo");
        assert_eq!(execution.steps.len(), definition.steps().len());
        assert_eq!(execution.agent_execution.status(), SubFeedStatus::NotStarted);
        assert_eq!(execution.report.status(), SubFeedStatus::NotStarted);
    }

    #[test]
    fn test_step_lookup() {
        let definition = PipelineDefinition::default();
        let execution = PipelineExecution::new(&definition, "repo", Some("e1".to_string()));

        assert_eq!(execution.step_status("fix"), Some(StepStatus::Pending));
        assert_eq!(execution.step_status("unknown"), None);
        assert_eq!(execution.step("report").map(|s| s.name.as_str()), Some("Generate Report"));
    }
}
