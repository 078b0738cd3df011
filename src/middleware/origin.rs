//! Origin/referrer access control
//!
//! Admits browser requests whose `Referer` or `Origin` contains one of the
//! configured domain strings.
//!
//! Matching is a plain substring test: `a.com` also admits
//! `evil-a.com.attacker.net`. Treat this as a convenience filter against
//! casual embedding, not as a security boundary.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{
    config::{Config, DEVELOPMENT_DOMAINS},
    error::AppError,
    routes::metrics::record_request,
    AppState,
};

/// Headers consulted for the access decision
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub referer: String,
    pub origin: String,
    pub user_agent: String,
}

impl RequestOrigin {
    /// Read `referer` (or `referrer`), `origin` and `user-agent`, defaulting to empty
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            referer: read(header::REFERER.as_str())
                .or_else(|| read("referrer"))
                .unwrap_or_default(),
            origin: read(header::ORIGIN.as_str()).unwrap_or_default(),
            user_agent: read(header::USER_AGENT.as_str()).unwrap_or_default(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.referer.contains(needle) || self.origin.contains(needle)
    }
}

/// Outcome of the access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Development or preview mode, or a localhost caller
    Development,
    /// No allow-list configured
    Unrestricted,
    /// An allow-list entry matched
    Allowed,
    Denied,
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        self != AccessDecision::Denied
    }
}

/// Decide whether a request may use the relay
pub fn evaluate(config: &Config, origin: &RequestOrigin) -> AccessDecision {
    let is_development = config.development || config.preview || origin.contains("localhost");

    let mut allowed: Vec<&str> = config.allowed_domains.iter().map(String::as_str).collect();
    if is_development {
        allowed.extend_from_slice(DEVELOPMENT_DOMAINS);
    }

    if is_development {
        AccessDecision::Development
    } else if allowed.is_empty() {
        AccessDecision::Unrestricted
    } else if allowed.iter().any(|domain| origin.contains(domain)) {
        AccessDecision::Allowed
    } else {
        AccessDecision::Denied
    }
}

/// Origin check middleware for the relay route
///
/// Only `POST` is checked; preflight and rejected methods pass through so
/// they are answered before any access decision.
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let origin = RequestOrigin::from_headers(request.headers());
    let decision = evaluate(&state.config, &origin);

    if !decision.is_granted() {
        warn!(
            referer = %origin.referer,
            origin = %origin.origin,
            user_agent = %origin.user_agent,
            "Blocked access from unauthorized domain"
        );
        record_request("denied");
        return Err(AppError::AccessDenied);
    }

    debug!(decision = ?decision, referer = %origin.referer, "Access granted");

    Ok(next.run(request).await)
}
