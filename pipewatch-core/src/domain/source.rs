//! Status source identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// The backend feed a snapshot or error originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Overall workflow status (all pipeline steps)
    Workflow,
    /// One sub-agent run, keyed by execution id
    AgentExecution,
    /// A generated report, keyed by execution id
    Report,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Workflow => "workflow",
            SourceKind::AgentExecution => "agentExecution",
            SourceKind::Report => "report",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
