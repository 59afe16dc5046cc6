//! Totals API Client
//!
//! HTTP client for the leaderboard backend's REST endpoints.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::dto::{self, ApiErrorBody, IngestRequest};
use crate::snapshot::TotalsSnapshot;
use crate::window::TimeWindow;

/// Leaderboard API client
#[derive(Clone)]
pub struct TotalsClient {
    client: Client,
    base_url: String,
}

impl TotalsClient {
    /// Create a client for `base_url`. Requests carry no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying HTTP client, shared with the event stream
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetch totals for a window
    pub async fn fetch_totals(&self, window: TimeWindow) -> Result<TotalsSnapshot, ClientError> {
        let url = dto::totals_url(&self.base_url, window);

        let response = self.client.get(&url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Status { status, message });
        }

        let body = response.text().await.map_err(request_error)?;
        dto::parse_totals(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Post one points award. Any HTTP answer is returned as its status code.
    pub async fn ingest(
        &self,
        request: &IngestRequest,
        timeout: Duration,
    ) -> Result<u16, ClientError> {
        let url = dto::ingest_url(&self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .timeout(timeout)
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status().as_u16())
    }
}

fn request_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the leaderboard API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Leaderboard API unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid totals body: {0}")]
    Decode(String),

    #[error("Request timeout")]
    Timeout,
}
