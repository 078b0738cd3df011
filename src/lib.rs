//! Chat Relay - streaming relay for a hosted conversational AI service
//!
//! Browser clients post chat messages here; the relay adds the server-held
//! API key and domain name, forwards the message upstream and streams the
//! reply back as normalized `data: {json}` events.

pub mod config;
pub mod error;
pub mod message;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod streaming;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{PersonalAiClient, Upstream};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Upstream the relay forwards messages to
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let http_client = PersonalAiClient::http_client(&config)?;
        let upstream: Arc<dyn Upstream> = Arc::new(PersonalAiClient::new(http_client, &config));

        Ok(Self::with_upstream(config, upstream))
    }

    /// Create an application state around a given upstream
    pub fn with_upstream(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            upstream,
        }
    }
}
