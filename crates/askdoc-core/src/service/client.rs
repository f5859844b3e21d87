use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{AskRequest, AskService};
use crate::error::AskError;

/// Upper bound for the `/healthz` check, independent of the ask timeout
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP client for the document Q&A service
#[derive(Clone)]
pub struct AskClient {
    client: Client,
    base_url: String,
}

impl AskClient {
    /// Builds a client for `base_url`. `timeout` bounds each whole request;
    /// `None` waits for as long as the service takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AskError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url)
    }

    /// Checks `GET /healthz`. Only used for the status badge, so it never
    /// waits longer than `HEALTH_TIMEOUT`.
    pub async fn health(&self) -> Result<bool, AskError> {
        let url = format!("{}/healthz", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let health: HealthResponse = response.json().await?;
        Ok(health.status == "ok")
    }
}

#[async_trait]
impl AskService for AskClient {
    async fn ask(&self, request: &AskRequest) -> Result<Value, AskError> {
        let url = self.ask_url();

        tracing::debug!(
            url = %url,
            history_len = request.conversation_history.len(),
            "sending question"
        );

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AskError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
