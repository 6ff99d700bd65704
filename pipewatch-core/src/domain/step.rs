//! Pipeline step domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of one pipeline step
///
/// The backend has emitted both snake_case and kebab-case spellings over
/// time, so both are accepted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    #[serde(alias = "in-progress")]
    InProgress,
    #[serde(alias = "need-help", alias = "needs-help", alias = "need_help")]
    NeedsHelp,
    Failed,
    Completed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::NeedsHelp => "needs_help",
            StepStatus::Failed => "failed",
            StepStatus::Completed => "completed",
        }
    }

    /// Whether the step has started at some point (in progress or completed).
    ///
    /// Sub-feeds tied to a step are only worth observing from this point on.
    pub fn has_started_work(&self) -> bool {
        matches!(self, StepStatus::InProgress | StepStatus::Completed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage of a pipeline run
///
/// `id`, `name` and `description` come from the static
/// [`PipelineDefinition`](super::definition::PipelineDefinition); only
/// `status` changes over the lifetime of an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: StepStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_both_spellings() {
        let snake: StepStatus = serde_json::from_str("\"in_progress\"").unwrap();
        let kebab: StepStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(snake, StepStatus::InProgress);
        assert_eq!(kebab, StepStatus::InProgress);

        let help: StepStatus = serde_json::from_str("\"need-help\"").unwrap();
        assert_eq!(help, StepStatus::NeedsHelp);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let result: Result<StepStatus, _> = serde_json::from_str("\"in_progres\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&StepStatus::NeedsHelp).unwrap();
        assert_eq!(json, "\"needs_help\"");
    }

    #[test]
    fn test_has_started_work() {
        assert!(StepStatus::InProgress.has_started_work());
        assert!(StepStatus::Completed.has_started_work());
        assert!(!StepStatus::Pending.has_started_work());
        assert!(!StepStatus::Failed.has_started_work());
        assert!(!StepStatus::NeedsHelp.has_started_work());
    }
}
