//! Agent execution source

use std::sync::Arc;

use async_trait::async_trait;
use pipewatch_core::domain::source::SourceKind;
use pipewatch_core::domain::subfeed::SubFeedState;

use super::{SourceError, StatusBackend, StatusSource};

/// Source for the agent-fix execution of one run
pub struct AgentExecutionSource {
    backend: Arc<dyn StatusBackend>,
    execution_id: String,
}

impl AgentExecutionSource {
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
impl StatusSource for AgentExecutionSource {
    type Snapshot = SubFeedState;

    fn kind(&self) -> SourceKind {
        SourceKind::AgentExecution
    }

    async fn fetch(&self) -> Result<SubFeedState, SourceError> {
        let snapshot = self
            .backend
            .agent_execution_status(&self.execution_id)
            .await?;

        Ok(snapshot
            .map(|snapshot| snapshot.into_state())
            .unwrap_or_else(SubFeedState::not_started))
    }
}
