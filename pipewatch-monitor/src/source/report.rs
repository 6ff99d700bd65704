//! Report source

use std::sync::Arc;

use async_trait::async_trait;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::domain::subfeed::SubFeedState;

use super::{SourceError, StatusBackend, StatusSource};

/// Source for the generated report of one run
pub struct ReportSource {
    backend: Arc<dyn StatusBackend>,
    execution_id: String,
}

impl ReportSource {
    pub fn new(backend: Arc<dyn StatusBackend>, execution_id: impl Into<String>) -> Self {
        Self {
            backend,
            execution_id: execution_id.into(),
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }
}

#[async_trait]
impl StatusSource for ReportSource {
    type Snapshot = SubFeedState;

    fn kind(&self) -> SourceKind {
        SourceKind::Report
    }

    async fn fetch(&self) -> Result<SubFeedState, SourceError> {
        let snapshot = self.backend.report(&self.execution_id).await?;

        Ok(snapshot
            .map(|snapshot| snapshot.into_state())
            .unwrap_or_else(SubFeedState::not_started))
    }
}
