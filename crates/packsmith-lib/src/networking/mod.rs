//! HTTP plumbing shared by package providers and the image cache

pub mod cache;

pub use cache::{ImageCache, MOD_PREVIEW_EXPIRATION};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Networking errors for provider and download traffic
#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON parsing failed: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Request cancelled: {url}")]
    Cancelled { url: String },
}

/// Networking configuration
#[derive(Debug, Clone)]
pub struct NetworkingConfig {
    /// HTTP client timeout in seconds
    pub timeout_seconds: u64,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Enable request/response tracing
    pub trace_requests: bool,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("packsmith/{}", env!("CARGO_PKG_VERSION")),
            trace_requests: false,
        }
    }
}

/// Owns the shared HTTP client
#[derive(Debug, Clone)]
pub struct NetworkingManager {
    client: Client,
    config: NetworkingConfig,
}

impl NetworkingManager {
    /// Build the HTTP client from configuration
    pub fn new(config: NetworkingConfig) -> Result<Self, NetworkingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        trace!(
            "Networking manager initialized with {}s timeout",
            config.timeout_seconds
        );

        Ok(Self { client, config })
    }

    /// GET a URL and return the body, failing on non-success status
    ///
    /// The request is abandoned as soon as `cancel` fires.
    pub async fn get_bytes(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, NetworkingError> {
        if self.config.trace_requests {
            trace!("GET {}", url);
        }

        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(NetworkingError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(response.bytes().await?.to_vec())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(NetworkingError::Cancelled { url: url.to_string() }),
            result = request => result,
        }
    }

    /// GET a URL and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T, NetworkingError> {
        let data = self.get_bytes(url, cancel).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
