//! Backend abstraction used by the sources
//!
//! The production implementation is [`BackendClient`]; tests provide
//! scripted implementations.

use async_trait::async_trait;
use pipewatch_client::BackendClient;
use pipewatch_core::dto::agent::AgentExecutionSnapshot;
use pipewatch_core::dto::report::ReportSnapshot;
use pipewatch_core::dto::workflow::WorkflowSnapshot;

use super::SourceError;

/// Network collaborator consumed by the status sources
#[async_trait]
pub trait StatusBackend: Send + Sync {
    /// Current status of every pipeline step
    async fn workflow_status(&self) -> Result<WorkflowSnapshot, SourceError>;

    /// Agent execution status; `None` while not yet available
    async fn agent_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<Option<AgentExecutionSnapshot>, SourceError>;

    /// Generated report; `None` while not yet available
    async fn report(&self, execution_id: &str) -> Result<Option<ReportSnapshot>, SourceError>;

    /// Starts a run and returns its execution id
    async fn start_run(&self, repo_url: &str) -> Result<String, SourceError>;
}

#[async_trait]
impl StatusBackend for BackendClient {
    async fn workflow_status(&self) -> Result<WorkflowSnapshot, SourceError> {
        Ok(self.get_workflow_status().await?)
    }

    async fn agent_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<Option<AgentExecutionSnapshot>, SourceError> {
        Ok(self.get_agent_execution_status(execution_id).await?)
    }

    async fn report(&self, execution_id: &str) -> Result<Option<ReportSnapshot>, SourceError> {
        Ok(self.get_report(execution_id).await?)
    }

    async fn start_run(&self, repo_url: &str) -> Result<String, SourceError> {
        Ok(BackendClient::start_run(self, repo_url).await?)
    }
}
