//! Header utilities for upstream requests
//!
//! Client headers are never forwarded. The upstream only sees the headers
//! built here.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// Header carrying the upstream API key
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Build the headers for an upstream request
pub fn build_upstream_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key).map_err(|_| {
        AppError::Internal(anyhow::anyhow!("API key contains invalid header characters"))
    })?;
    key.set_sensitive(true);

    headers.insert(API_KEY_HEADER, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
