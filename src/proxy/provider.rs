//! Upstream abstraction layer
//!
//! Defines the trait interface for the conversational service the relay
//! forwards to, so handlers can be exercised against any implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::error::AppResult;
use crate::message::UpstreamMessage;

/// Stream type for streaming responses from the upstream
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Trait defining the interface for the upstream service
///
/// # Security
///
/// Implementations MUST:
/// - Send the API key only as a request header
/// - Never forward client headers
/// - Never return the upstream error body to the caller
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Get the upstream name for logging and metrics
    fn name(&self) -> &'static str;

    /// Send one message and return the open response body.
    ///
    /// A non-success status yields `AppError::UpstreamStatus` and no stream.
    async fn open_stream(&self, api_key: &str, message: &UpstreamMessage) -> AppResult<ByteStream>;
}
