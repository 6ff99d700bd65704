//! Workflow status source

use std::sync::Arc;

use async_trait::async_trait;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::dto::workflow::WorkflowSnapshot;

use super::{SourceError, StatusBackend, StatusSource};

/// Source for the overall workflow feed
pub struct WorkflowSource {
    backend: Arc<dyn StatusBackend>,
}

impl WorkflowSource {
    pub fn new(backend: Arc<dyn StatusBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl StatusSource for WorkflowSource {
    type Snapshot = WorkflowSnapshot;

    fn kind(&self) -> SourceKind {
        SourceKind::Workflow
    }

    async fn fetch(&self) -> Result<WorkflowSnapshot, SourceError> {
        self.backend.workflow_status().await
    }
}
