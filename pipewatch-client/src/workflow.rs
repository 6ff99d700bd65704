//! Workflow API endpoints

use pipewatch_core::dto::run::{StartRunRequest, StartRunResponse};
use pipewatch_core::dto::workflow::WorkflowSnapshot;

use crate::BackendClient;
use crate::error::{ClientError, Result};

impl BackendClient {
    // =============================================================================
    // Workflow
    // =============================================================================

    /// Fetch the current status of every pipeline step
    pub async fn get_workflow_status(&self) -> Result<WorkflowSnapshot> {
        let response = self
            .client
            .get(self.url("/api/workflow-status"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Start a new pipeline run
    ///
    /// # Arguments
    /// * `repo_url` - The repository the run operates on
    ///
    /// # Returns
    /// The execution id assigned by the backend
    pub async fn start_run(&self, repo_url: &str) -> Result<String> {
        if repo_url.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "repo_url cannot be empty".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.url("/api/start-run"))
            .json(&StartRunRequest {
                repo_url: repo_url.to_string(),
            })
            .send()
            .await?;

        let started: StartRunResponse = self.handle_response(response).await?;
        Ok(started.execution_id)
    }
}
