//! Sub-feed API endpoints
//!
//! Both feeds are keyed by execution id and may legitimately be missing
//! while the corresponding step has not produced anything yet.

use pipewatch_core::dto::agent::AgentExecutionSnapshot;
use pipewatch_core::dto::report::ReportSnapshot;

use crate::BackendClient;
use crate::error::{ClientError, Result};

impl BackendClient {
    // =============================================================================
    // Sub-feeds
    // =============================================================================

    /// Get the status of the agent-fix execution for a run
    ///
    /// # Returns
    /// `None` while the backend has no record of the execution
    pub async fn get_agent_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<Option<AgentExecutionSnapshot>> {
        check_execution_id(execution_id)?;

        let response = self
            .client
            .get(self.url("/api/agent-execution-status"))
            .query(&[("executionId", execution_id)])
            .send()
            .await?;

        self.handle_optional_response(response).await
    }

    /// Get the generated report for a run
    ///
    /// # Returns
    /// `None` while the report has not been generated
    pub async fn get_report(&self, execution_id: &str) -> Result<Option<ReportSnapshot>> {
        check_execution_id(execution_id)?;

        let response = self
            .client
            .get(self.url("/api/report"))
            .query(&[("executionId", execution_id)])
            .send()
            .await?;

        self.handle_optional_response(response).await
    }
}

fn check_execution_id(execution_id: &str) -> Result<()> {
    if execution_id.is_empty() {
        return Err(ClientError::InvalidRequest(
            "execution_id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
