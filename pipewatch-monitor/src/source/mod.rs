//! Status sources
//!
//! A status source is a typed accessor for one backend feed. Sources are
//! stateless: every `fetch` asks the backend again. Scheduling and
//! deduplication live in [`crate::scheduler`].

mod agent;
mod backend;
mod report;
mod workflow;

pub use agent::AgentExecutionSource;
pub use backend::StatusBackend;
pub use report::ReportSource;
pub use workflow::WorkflowSource;

use async_trait::async_trait;
use pipewatch_client::ClientError;
use pipewatch_core::domain::source::SourceKind;
use thiserror::Error;

/// Errors produced while fetching from a source
///
/// All of them are transient from the poller's point of view.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with an error status
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The response did not match the expected schema
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        if err.is_malformed() {
            return SourceError::Malformed(err.to_string());
        }

        match err {
            ClientError::ApiError { status, message } => SourceError::Backend { status, message },
            other => SourceError::Transport(other.to_string()),
        }
    }
}

/// A pollable feed producing typed snapshots
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    /// What one successful fetch yields
    type Snapshot: Send + 'static;

    fn kind(&self) -> SourceKind;

    /// Fetches the current snapshot from the backend
    async fn fetch(&self) -> Result<Self::Snapshot, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBackend, workflow};
    use pipewatch_core::domain::step::StepStatus;
    use pipewatch_core::domain::subfeed::SubFeedStatus;
    use pipewatch_core::dto::agent::AgentExecutionSnapshot;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_sub_feeds_are_not_started() {
        let backend: Arc<dyn StatusBackend> = Arc::new(ScriptedBackend::new());

        let agent = AgentExecutionSource::new(Arc::clone(&backend), "e1");
        let report = ReportSource::new(backend, "e1");

        assert_eq!(agent.fetch().await.unwrap().status(), SubFeedStatus::NotStarted);
        assert_eq!(report.fetch().await.unwrap().status(), SubFeedStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_agent_source_queries_its_execution() {
        let scripted = Arc::new(ScriptedBackend::new());
        scripted.push_agent(Ok(Some(AgentExecutionSnapshot {
            status: SubFeedStatus::Pending,
            branch: None,
            output: None,
            error: None,
        })));
        let backend: Arc<dyn StatusBackend> = scripted.clone();

        let source = AgentExecutionSource::new(backend, "e7");
        let state = source.fetch().await.unwrap();

        assert_eq!(state.status(), SubFeedStatus::Pending);
        assert_eq!(source.kind(), SourceKind::AgentExecution);
        assert_eq!(scripted.agent_ids(), vec!["e7".to_string()]);
    }

    #[tokio::test]
    async fn test_workflow_source_passes_errors_through() {
        let scripted = Arc::new(ScriptedBackend::new());
        scripted.push_workflow(Err(SourceError::Backend {
            status: 503,
            message: "unavailable".to_string(),
        }));
        scripted.push_workflow(Ok(workflow(Some("e1"), true, &[("clone", StepStatus::Completed)])));
        let source = WorkflowSource::new(scripted);

        assert!(matches!(
            source.fetch().await,
            Err(SourceError::Backend { status: 503, .. })
        ));
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn test_client_error_conversion() {
        let backend: SourceError = ClientError::api_error(502, "bad gateway").into();
        assert!(matches!(backend, SourceError::Backend { status: 502, .. }));

        let malformed: SourceError = ClientError::ParseError("expected bool".to_string()).into();
        assert!(matches!(malformed, SourceError::Malformed(_)));

        let invalid: SourceError = ClientError::InvalidRequest("empty id".to_string()).into();
        assert!(matches!(invalid, SourceError::Transport(_)));
    }
}
