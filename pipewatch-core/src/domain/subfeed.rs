//! Sub-feed domain types
//!
//! A sub-feed is an auxiliary artifact of a run that may not exist yet: the
//! agent-fix execution and the generated report. Each is tracked as a single
//! [`SubFeedState`] that is replaced wholesale on every snapshot.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a sub-feed artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubFeedStatus {
    #[default]
    #[serde(alias = "not-started")]
    NotStarted,
    Pending,
    Running,
    Completed,
    Failed,
}

impl SubFeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubFeedStatus::NotStarted => "not_started",
            SubFeedStatus::Pending => "pending",
            SubFeedStatus::Running => "running",
            SubFeedStatus::Completed => "completed",
            SubFeedStatus::Failed => "failed",
        }
    }

    /// Completed and failed sub-feeds never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubFeedStatus::Completed | SubFeedStatus::Failed)
    }
}

impl fmt::Display for SubFeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the agent-fix execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    /// Branch the agent pushed its fixes to
    pub branch: Option<String>,
    pub output: Option<String>,
    pub error: Option<String>,
}

/// A generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub report: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Feed-specific result, only present once the feed is terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubFeedPayload {
    Agent(AgentOutcome),
    Report(ReportDocument),
}

/// Current state of one sub-feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFeedState {
    status: SubFeedStatus,
    payload: Option<SubFeedPayload>,
}

impl SubFeedState {
    /// State of a feed that has not produced anything yet
    pub fn not_started() -> Self {
        Self::default()
    }

    /// Builds a state, dropping the payload unless the status is terminal
    pub fn new(status: SubFeedStatus, payload: Option<SubFeedPayload>) -> Self {
        let payload = if status.is_terminal() { payload } else { None };
        Self { status, payload }
    }

    pub fn status(&self) -> SubFeedStatus {
        self.status
    }

    pub fn payload(&self) -> Option<&SubFeedPayload> {
        self.payload.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_started_is_default() {
        let state = SubFeedState::not_started();
        assert_eq!(state.status(), SubFeedStatus::NotStarted);
        assert!(state.payload().is_none());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_payload_dropped_for_non_terminal_status() {
        let payload = SubFeedPayload::Agent(AgentOutcome {
            output: Some("partial".to_string()),
            ..Default::default()
        });
        let state = SubFeedState::new(SubFeedStatus::Running, Some(payload));
        assert!(state.payload().is_none());
    }

    #[test]
    fn test_payload_kept_for_terminal_status() {
        let payload = SubFeedPayload::Report(ReportDocument {
            report: "Executive summary".to_string(),
            created_at: None,
        });
        let state = SubFeedState::new(SubFeedStatus::Completed, Some(payload.clone()));
        assert!(state.is_terminal());
        assert_eq!(state.payload(), Some(&payload));
    }
}
