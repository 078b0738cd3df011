//! Configuration management for the relay
//!
//! Configuration is loaded once at startup and passed to handlers through
//! `AppState`. Handlers never read the environment themselves.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Upstream endpoint used when `PERSONAL_AI_API_URL` is not set
pub const DEFAULT_UPSTREAM_URL: &str = "https://api-enterprise.personal.ai/v1/message/stream";

/// Domains that are always admitted in development mode
pub const DEVELOPMENT_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "vercel.app"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream streaming endpoint
    pub upstream_url: String,
    /// API key attached to every upstream request
    pub api_key: Option<String>,
    /// Domain identifier injected into every upstream request body
    pub domain_name: Option<String>,

    /// Referrer/origin substrings permitted to call the relay
    pub allowed_domains: Vec<String>,
    /// `NODE_ENV=development`
    pub development: bool,
    /// `VERCEL_ENV=preview`
    pub preview: bool,

    /// Connect timeout for the upstream
    pub upstream_connect_timeout: Duration,
    /// Longest idle gap tolerated between two upstream chunks
    pub upstream_read_timeout: Duration,
    /// Upper bound for a partial line held back between chunks
    pub max_pending_line_bytes: usize,
}

/// Credentials required to contact the upstream
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub api_key: &'a str,
    pub domain_name: &'a str,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("RELAY_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid RELAY_PORT")?,

            upstream_url: lookup("PERSONAL_AI_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            api_key: lookup("PERSONAL_AI_API_KEY").filter(|v| !v.is_empty()),
            domain_name: lookup("DOMAIN_NAME").filter(|v| !v.is_empty()),

            allowed_domains: lookup("ALLOWED_DOMAINS")
                .map(|v| parse_domain_list(&v))
                .unwrap_or_default(),
            development: lookup("NODE_ENV").is_some_and(|v| v == "development"),
            preview: lookup("VERCEL_ENV").is_some_and(|v| v == "preview"),

            upstream_connect_timeout: Duration::from_secs(
                lookup("UPSTREAM_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .context("Invalid UPSTREAM_CONNECT_TIMEOUT_SECS")?,
            ),
            upstream_read_timeout: Duration::from_secs(
                lookup("UPSTREAM_READ_TIMEOUT_SECS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse()
                    .context("Invalid UPSTREAM_READ_TIMEOUT_SECS")?,
            ),
            max_pending_line_bytes: lookup("MAX_PENDING_LINE_BYTES")
                .unwrap_or_else(|| "1048576".to_string())
                .parse()
                .context("Invalid MAX_PENDING_LINE_BYTES")?,
        })
    }

    /// Credentials for the upstream, or the name of the first missing value
    pub fn credentials(&self) -> Result<Credentials<'_>, &'static str> {
        let api_key = self.api_key.as_deref().ok_or("PERSONAL_AI_API_KEY")?;
        let domain_name = self.domain_name.as_deref().ok_or("DOMAIN_NAME")?;
        Ok(Credentials {
            api_key,
            domain_name,
        })
    }
}

/// Split a comma-separated domain list, trimming entries and dropping empty ones
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
