//! Run start DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /api/start-run`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRunRequest {
    pub repo_url: String,
}

/// Response of `POST /api/start-run`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRunResponse {
    #[serde(alias = "execution_id")]
    pub execution_id: String,
}
