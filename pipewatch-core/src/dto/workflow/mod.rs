//! Workflow status DTOs

use serde::{Deserialize, Serialize};

use crate::domain::step::StepStatus;

/// Status of one step as reported by the workflow feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub id: String,
    pub status: StepStatus,
}

/// Snapshot returned by `GET /api/workflow-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    #[serde(default, alias = "execution_id")]
    pub execution_id: Option<String>,
    #[serde(default, alias = "repo_url")]
    pub repo_url: String,
    #[serde(alias = "is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub steps: Vec<StepReport>,
}
