//! Request logging utilities for the relay
//!
//! Provides structured logging with a short correlation id so a single relayed
//! conversation turn can be followed through the logs.

use std::time::Instant;
use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Context for tracking one relayed request
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: String,
    /// Session id echoed in every outbound event
    pub session_id: String,
}

impl RelayContext {
    /// Create a new relay context
    pub fn new(upstream: &str, session_id: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            upstream: upstream.to_string(),
            session_id: session_id.to_string(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, text_len: usize, is_draft: bool) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
            text_len = %text_len,
            is_draft = %is_draft,
            "Relay request started"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log stream ended
    pub fn log_stream_ended(&self, events: usize) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
            events = %events,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    /// Log a line that could not be forwarded
    pub fn log_line_skipped(&self, error: &str) {
        warn!(
            trace_id = %self.trace_id,
            session_id = %self.session_id,
            error = %error,
            "Error processing streaming line"
        );
    }

    /// Log a failure while reading the upstream body
    pub fn log_stream_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Streaming error"
        );
    }

    /// Log timeout
    pub fn log_timeout(&self, timeout_ms: u128) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
            timeout_ms = %timeout_ms,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream read timed out"
        );
    }

    /// Log request failure before streaming started
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Relay request failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            session_id = %self.session_id,
        )
    }
}
