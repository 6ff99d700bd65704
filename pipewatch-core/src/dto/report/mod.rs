//! Report DTOs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::subfeed::{ReportDocument, SubFeedPayload, SubFeedState, SubFeedStatus};

/// Snapshot returned by `GET /api/report`
///
/// The report endpoint may omit `status`; a body carrying a report is then
/// taken as completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    #[serde(default)]
    pub status: Option<SubFeedStatus>,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

impl ReportSnapshot {
    pub fn effective_status(&self) -> SubFeedStatus {
        match (self.status, &self.report) {
            (Some(status), _) => status,
            (None, Some(_)) => SubFeedStatus::Completed,
            (None, None) => SubFeedStatus::Pending,
        }
    }

    pub fn into_state(self) -> SubFeedState {
        let status = self.effective_status();
        let created_at = self.created_at.as_deref().and_then(parse_timestamp);
        let payload = self.report.map(|report| {
            SubFeedPayload::Report(ReportDocument { report, created_at })
        });
        SubFeedState::new(status, payload)
    }
}

/// Parses RFC 3339 timestamps, falling back to naive ISO 8601 taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
