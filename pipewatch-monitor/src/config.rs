//! Monitor configuration
//!
//! Defines the backend connection and the polling cadence of each feed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Polling policy for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    /// Time between ticks while the poller is active
    pub interval_ms: u64,
}

impl PollConfig {
    pub const fn from_millis(interval_ms: u64) -> Self {
        Self { interval_ms }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Monitor configuration
///
/// Cadences differ per source: the workflow feed drives everything else and
/// is polled fastest, the report changes at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub backend_url: String,

    /// Workflow status feed
    pub workflow: PollConfig,

    /// Agent execution feed
    pub agent_execution: PollConfig,

    /// Report feed
    pub report: PollConfig,
}

impl MonitorConfig {
    pub const DEFAULT_WORKFLOW_INTERVAL_MS: u64 = 1_000;
    pub const DEFAULT_AGENT_INTERVAL_MS: u64 = 3_000;
    pub const DEFAULT_REPORT_INTERVAL_MS: u64 = 5_000;

    /// Creates a new configuration with default cadences
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            workflow: PollConfig::from_millis(Self::DEFAULT_WORKFLOW_INTERVAL_MS),
            agent_execution: PollConfig::from_millis(Self::DEFAULT_AGENT_INTERVAL_MS),
            report: PollConfig::from_millis(Self::DEFAULT_REPORT_INTERVAL_MS),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional):
    /// - PIPEWATCH_BACKEND_URL (default: http://localhost:8000)
    /// - WORKFLOW_POLL_INTERVAL_MS (default: 1000)
    /// - AGENT_POLL_INTERVAL_MS (default: 3000)
    /// - REPORT_POLL_INTERVAL_MS (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend_url =
            std::env::var("PIPEWATCH_BACKEND_URL").unwrap_or(defaults.backend_url);

        Self {
            backend_url,
            workflow: poll_config_from_env("WORKFLOW_POLL_INTERVAL_MS", defaults.workflow),
            agent_execution: poll_config_from_env("AGENT_POLL_INTERVAL_MS", defaults.agent_execution),
            report: poll_config_from_env("REPORT_POLL_INTERVAL_MS", defaults.report),
        }
    }

    /// Replaces the backend URL
    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        for (name, poll) in [
            ("workflow", self.workflow),
            ("agent_execution", self.agent_execution),
            ("report", self.report),
        ] {
            if poll.interval_ms == 0 {
                anyhow::bail!("{} poll interval must be greater than 0", name);
            }
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

fn poll_config_from_env(var: &str, default: PollConfig) -> PollConfig {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(interval_ms) => PollConfig::from_millis(interval_ms),
            Err(_) => {
                warn!("Ignoring invalid {}={:?}, using {}ms", var, raw, default.interval_ms);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.workflow.interval(), Duration::from_secs(1));
        assert_eq!(config.agent_execution.interval(), Duration::from_secs(3));
        assert_eq!(config.report.interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = MonitorConfig::default();

        config.backend_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.backend_url = String::new();
        assert!(config.validate().is_err());

        config = config.with_backend_url("https://status.example");
        assert!(config.validate().is_ok());

        config.report = PollConfig::from_millis(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_config_uses_interval_ms_key() {
        let poll: PollConfig = serde_json::from_str(r#"{ "intervalMs": 250 }"#).unwrap();
        assert_eq!(poll.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_unset_env_var_uses_default() {
        let fallback = PollConfig::from_millis(42);
        let poll = poll_config_from_env("PIPEWATCH_TEST_UNSET_INTERVAL", fallback);
        assert_eq!(poll, fallback);
    }
}
