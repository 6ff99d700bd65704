//! Agent execution status DTOs

use serde::{Deserialize, Serialize};

use crate::domain::subfeed::{AgentOutcome, SubFeedPayload, SubFeedState, SubFeedStatus};

/// Snapshot returned by `GET /api/agent-execution-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentExecutionSnapshot {
    pub status: SubFeedStatus,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AgentExecutionSnapshot {
    pub fn into_state(self) -> SubFeedState {
        let payload = SubFeedPayload::Agent(AgentOutcome {
            branch: self.branch,
            output: self.output,
            error: self.error,
        });
        SubFeedState::new(self.status, Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_snapshot_keeps_output() {
        let snapshot: AgentExecutionSnapshot = serde_json::from_value(json!({
            "execution_id": "cline_1700000000",
            "repo_url": "https://example/repo",
            "status": "completed",
            "branch": "main",
            "output": "Applied 2 fixes"
        }))
        .unwrap();

        let state = snapshot.into_state();
        assert_eq!(state.status(), SubFeedStatus::Completed);
        match state.payload() {
            Some(SubFeedPayload::Agent(outcome)) => {
                assert_eq!(outcome.output.as_deref(), Some("Applied 2 fixes"));
                assert_eq!(outcome.branch.as_deref(), Some("main"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_running_snapshot_has_no_payload() {
        let snapshot: AgentExecutionSnapshot =
            serde_json::from_value(json!({ "status": "running" })).unwrap();
        let state = snapshot.into_state();
        assert_eq!(state.status(), SubFeedStatus::Running);
        assert!(state.payload().is_none());
    }
}
