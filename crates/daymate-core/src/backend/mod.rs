//! HTTP client for the external chat backend.
//!
//! Three endpoints, no authentication:
//! - `POST {base}/chat` with the message and recent history
//! - `GET {base}/suggestions` for starter chips
//! - `GET {base}/health` liveness probe
//!
//! Chat and suggestions are single attempts; callers decide how to degrade
//! (see [`crate::chat`]). Only the health probe retries, up to
//! `max_retries` extra attempts.

pub mod types;

use reqwest::{Client, Response};
use tracing::{debug, warn};

pub use types::{ChatRequest, ChatResponse, HealthStatus, SuggestionsResponse};

use crate::error::BackendError;
use crate::storage::BackendConfig;

/// Client for the chat backend.
pub struct BackendClient {
    config: BackendConfig,
    http_client: Client,
}

impl BackendClient {
    /// Create a client whose requests time out after `config.timeout_ms`.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn check_status(resp: Response) -> Result<Response, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    /// Send a user message with the preceding conversation history.
    pub async fn chat(
        &self,
        message: &str,
        history: &[String],
    ) -> Result<ChatResponse, BackendError> {
        let url = self.config.chat_url()?;
        debug!(%url, history_len = history.len(), "sending chat message");

        let resp = self
            .http_client
            .post(url)
            .json(&ChatRequest { message, history })
            .send()
            .await?;

        Ok(Self::check_status(resp)?.json().await?)
    }

    /// Fetch starter suggestion chips.
    pub async fn suggestions(&self) -> Result<Vec<String>, BackendError> {
        let url = self.config.suggestions_url()?;
        let resp = self.http_client.get(url).send().await?;
        let body: SuggestionsResponse = Self::check_status(resp)?.json().await?;
        Ok(body.suggestions)
    }

    async fn health_once(&self) -> Result<HealthStatus, BackendError> {
        let url = self.config.health_url()?;
        let resp = self.http_client.get(url).send().await?;
        Ok(Self::check_status(resp)?.json().await?)
    }

    /// Probe the backend, retrying immediately on failure.
    ///
    /// Returns the last error once `1 + max_retries` attempts have failed.
    /// An invalid URL is not retried.
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            match self.health_once().await {
                Ok(status) => return Ok(status),
                Err(e @ BackendError::InvalidUrl { .. }) => return Err(e),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(attempt, error = %e, "health check failed, retrying");
                    attempt += 1;
                }
            }
        }
    }
}
