//! Common test utilities for the relay
//!
//! Shared fixtures and a harness wiring the router to a mock upstream.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum_test::{TestRequest, TestServer};
use serde_json::Value;

use chat_relay::{routes, AppState, Config};

use crate::mocks::personal_ai::MockPersonalAi;

/// Test configuration constants
pub mod constants {
    /// API key configured for the relay and expected by the mock upstream
    pub const TEST_API_KEY: &str = "test-personal-ai-key";
    /// Domain name injected into upstream bodies
    pub const TEST_DOMAIN: &str = "test-domain";
    /// Domain on the allow-list
    pub const ALLOWED_DOMAIN: &str = "example.com";
    /// Referer matching the allow-list
    pub const ALLOWED_REFERER: &str = "https://example.com/chat";
    /// Referer not matching the allow-list
    pub const EVIL_REFERER: &str = "https://evil.com/";
    /// Session id sent by well-behaved clients
    pub const TEST_SESSION_ID: &str = "session-test-1";
}

/// Test harness with the full router and a mock upstream
pub struct RelayTestHarness {
    pub server: TestServer,
    pub upstream: MockPersonalAi,
}

impl RelayTestHarness {
    /// Harness with credentials configured and `example.com` allow-listed
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Harness with extra or overriding configuration values.
    ///
    /// An empty value behaves like an unset variable.
    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let upstream = MockPersonalAi::start().await;

        let mut vars: HashMap<String, String> = HashMap::from([
            ("PERSONAL_AI_API_KEY".to_string(), constants::TEST_API_KEY.to_string()),
            ("DOMAIN_NAME".to_string(), constants::TEST_DOMAIN.to_string()),
            ("ALLOWED_DOMAINS".to_string(), constants::ALLOWED_DOMAIN.to_string()),
            ("PERSONAL_AI_API_URL".to_string(), upstream.stream_url()),
            ("UPSTREAM_READ_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration should parse");
        let state = Arc::new(AppState::new(config).expect("state should build"));
        let server = TestServer::new(routes::create_router(state))
            .expect("Failed to create test server");

        Self { server, upstream }
    }

    /// `POST /proxy` from an allow-listed page
    pub fn post_message(&self, body: &Value) -> TestRequest {
        self.post_message_from(constants::ALLOWED_REFERER, body)
    }

    /// `POST /proxy` with the given referer
    pub fn post_message_from(&self, referer: &str, body: &Value) -> TestRequest {
        self.server
            .post("/proxy")
            .add_header(header::REFERER, HeaderValue::from_str(referer).unwrap())
            .json(body)
    }
}

/// Split a relay body into its decoded events
pub fn parse_events(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter(|frame| !frame.is_empty())
        .map(|frame| {
            let json = frame
                .strip_prefix("data: ")
                .unwrap_or_else(|| panic!("frame without data prefix: {frame:?}"));
            serde_json::from_str(json).expect("event should be JSON")
        })
        .collect()
}
