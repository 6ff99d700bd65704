//! Snapshot reconciliation
//!
//! Merges one incoming snapshot into the current execution. The merge is a
//! pure function of its inputs: the current value is never mutated, and
//! applying the same snapshot twice yields the same execution.

use pipewatch_core::domain::definition::PipelineDefinition;
use pipewatch_core::domain::execution::PipelineExecution;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::domain::subfeed::SubFeedState;
use pipewatch_core::dto::workflow::WorkflowSnapshot;

/// A snapshot tagged with the source it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUpdate {
    Workflow(WorkflowSnapshot),
    AgentExecution(SubFeedState),
    Report(SubFeedState),
}

impl SourceUpdate {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceUpdate::Workflow(_) => SourceKind::Workflow,
            SourceUpdate::AgentExecution(_) => SourceKind::AgentExecution,
            SourceUpdate::Report(_) => SourceKind::Report,
        }
    }
}

/// Produces the next execution from the current one and an incoming update
///
/// Without a current execution, one is seeded from `definition` first.
///
/// Workflow snapshots overwrite the status of known steps (unknown ids are
/// dropped) and carry the authoritative `is_active`, `repo_url` and
/// `execution_id`. Sub-feed snapshots replace their slot wholesale. Status
/// transitions are not checked: the backend is the source of truth.
pub fn reconcile(
    definition: &PipelineDefinition,
    current: Option<&PipelineExecution>,
    update: &SourceUpdate,
) -> PipelineExecution {
    let mut next = match current {
        Some(execution) => execution.clone(),
        None => PipelineExecution::new(definition, "", None),
    };

    match update {
        SourceUpdate::Workflow(snapshot) => apply_workflow(&mut next, snapshot),
        SourceUpdate::AgentExecution(state) => next.agent_execution = state.clone(),
        SourceUpdate::Report(state) => next.report = state.clone(),
    }

    next
}

fn apply_workflow(execution: &mut PipelineExecution, snapshot: &WorkflowSnapshot) {
    for reported in &snapshot.steps {
        if let Some(step) = execution.steps.iter_mut().find(|s| s.id == reported.id) {
            step.status = reported.status;
        }
    }

    execution.is_active = snapshot.is_active;

    // An empty url or missing id means the feed did not report it, not that it changed
    if !snapshot.repo_url.is_empty() {
        execution.repo_url = snapshot.repo_url.clone();
    }
    if let Some(execution_id) = &snapshot.execution_id {
        execution.execution_id = Some(execution_id.clone());
    }
}
