//! Pipewatch HTTP Client
//!
//! A typed HTTP client for the status backend of a repair pipeline.
//!
//! The backend exposes one feed for the overall workflow and two per-run
//! sub-feeds (agent execution and report). Sub-feed lookups treat a 404 as
//! "not yet available" and return `Ok(None)`.
//!
//! # Example
//!
//! ```no_run
//! use pipewatch_client::BackendClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipewatch_client::ClientError> {
//!     let client = BackendClient::new("http://localhost:8000");
//!
//!     let execution_id = client.start_run("https://github.com/user/repo").await?;
//!     let snapshot = client.get_workflow_status().await?;
//!
//!     println!("{} active: {}", execution_id, snapshot.is_active);
//!     Ok(())
//! }
//! ```

pub mod error;
mod feeds;
mod workflow;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the status backend
///
/// Endpoints are grouped into:
/// - Workflow: overall status and run start
/// - Feeds: agent execution status and generated reports
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use pipewatch_client::BackendClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BackendClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle a response for a resource that may not exist yet
    ///
    /// A 404 maps to `Ok(None)`; every other status is handled like
    /// [`handle_response`](Self::handle_response).
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let url = response.url().clone();
        match self.handle_response(response).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                debug!("Resource not available yet: {}", url);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BackendClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/workflow-status"),
            "http://localhost:8000/api/workflow-status"
        );
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = BackendClient::with_client("http://localhost:8000", http_client);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
