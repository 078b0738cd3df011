//! Personal AI message-stream client
//!
//! Sends one message per request to the streaming endpoint and hands the open
//! response body back to the caller.

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use super::headers::build_upstream_headers;
use super::provider::{ByteStream, Upstream};
use crate::{
    config::Config,
    error::{AppError, AppResult},
    message::UpstreamMessage,
};

/// Client for the Personal AI streaming endpoint
pub struct PersonalAiClient {
    client: reqwest::Client,
    url: String,
}

impl PersonalAiClient {
    /// Create a new client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            url: config.upstream_url.clone(),
        }
    }

    /// Build the shared HTTP client used for upstream calls
    ///
    /// No total request timeout is set since responses are long-lived
    /// streams; idle reads are bounded by the relay instead.
    pub fn http_client(config: &Config) -> AppResult<reqwest::Client> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .connect_timeout(config.upstream_connect_timeout)
            .build()?;
        Ok(client)
    }
}

#[async_trait]
impl Upstream for PersonalAiClient {
    fn name(&self) -> &'static str {
        "personal_ai"
    }

    #[instrument(skip_all, fields(session_id = %message.session_id))]
    async fn open_stream(&self, api_key: &str, message: &UpstreamMessage) -> AppResult<ByteStream> {
        let headers = build_upstream_headers(api_key)?;

        debug!(url = %self.url, text_len = message.text.len(), "Sending message upstream");

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.url, error = %e, "Failed to send request upstream");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = %status.as_u16(),
                reason = %status.canonical_reason().unwrap_or("unknown"),
                "Personal AI API error"
            );
            return Err(AppError::UpstreamStatus(status));
        }

        Ok(Box::pin(response.bytes_stream()))
    }
}
