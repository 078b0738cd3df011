//! Mock Personal AI message-stream endpoint
//!
//! Provides wiremock-based mocks for `POST /v1/message/stream`.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::personal_ai::MockPersonalAi;
//!
//! #[tokio::test]
//! async fn test_with_upstream_mock() {
//!     let upstream = MockPersonalAi::start().await;
//!     upstream.mock_stream("data: {\"ai_message\":\"hi\"}\n\n").await;
//!
//!     // Use upstream.stream_url() as PERSONAL_AI_API_URL
//! }
//! ```

use serde_json::Value;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants;

/// Path of the streaming endpoint
pub const STREAM_PATH: &str = "/v1/message/stream";

/// Mock upstream server wrapper
pub struct MockPersonalAi {
    server: MockServer,
}

impl MockPersonalAi {
    /// Start a new mock upstream
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Full URL of the streaming endpoint
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.server.uri(), STREAM_PATH)
    }

    /// Respond to authenticated requests with the given raw stream body
    pub async fn mock_stream(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(STREAM_PATH))
            .and(header("x-api-key", constants::TEST_API_KEY))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Respond only when the request body contains `expected`
    pub async fn mock_stream_expecting(&self, expected: Value, body: &str) {
        Mock::given(method("POST"))
            .and(path(STREAM_PATH))
            .and(header("x-api-key", constants::TEST_API_KEY))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Respond with an error status and a body that must not reach the client
    pub async fn mock_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(STREAM_PATH))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_string("internal upstream detail: quota exceeded for acme"),
            )
            .mount(&self.server)
            .await;
    }

    /// Requests the upstream has received so far
    pub async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Parsed JSON body of the `n`th received request
    pub async fn received_body(&self, n: usize) -> Value {
        let requests = self.received().await;
        serde_json::from_slice(&requests[n].body).expect("upstream body should be JSON")
    }
}
