//! Configuration module
//!
//! Builds the monitor configuration from the environment and CLI flags.

use anyhow::{Context, Result};
use pipewatch_client::BackendClient;
use pipewatch_monitor::MonitorConfig;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads configuration from the environment, applying CLI overrides
pub fn load_config(backend_url: Option<String>) -> Result<MonitorConfig> {
    let mut config = MonitorConfig::from_env();
    if let Some(url) = backend_url {
        config = config.with_backend_url(url);
    }

    config.validate().context("Invalid configuration")?;
    debug!("Loaded configuration: {:?}", config);

    Ok(config)
}

/// Creates a backend client with a request timeout
pub fn backend_client(config: &MonitorConfig) -> Result<BackendClient> {
    let http_client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(BackendClient::with_client(&config.backend_url, http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_wins() {
        let config = load_config(Some("https://status.example/".to_string())).unwrap();
        assert_eq!(config.backend_url, "https://status.example/");

        let client = backend_client(&config).unwrap();
        assert_eq!(client.base_url(), "https://status.example");
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(load_config(Some("localhost:8000".to_string())).is_err());
    }
}
