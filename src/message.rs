//! Request bodies accepted from clients and sent upstream

use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::{AppError, AppResult};

/// Default sender when the client does not name one
pub const DEFAULT_USER_NAME: &str = "anonymous@user.com";

/// Default source label when the client does not name one
pub const DEFAULT_SOURCE_NAME: &str = "WebChat";

/// Message submitted by a browser client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "UserName")]
    pub user_name: Option<String>,
    #[serde(rename = "SourceName")]
    pub source_name: Option<String>,
    #[serde(rename = "SessionId")]
    pub session_id: Option<String>,
    pub is_draft: Option<bool>,
}

/// Inbound message after validation, with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage {
    pub text: String,
    pub user_name: String,
    pub source_name: String,
    pub session_id: String,
    pub is_draft: bool,
}

/// Body sent to the upstream. Carries the server-held domain name.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamMessage {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "SourceName")]
    pub source_name: String,
    #[serde(rename = "SessionId")]
    pub session_id: String,
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    pub is_draft: bool,
}

impl InboundMessage {
    /// Parse a raw request body. An empty body reads as an empty message.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Session id the client asked for, or a fresh timestamp-based one
    pub fn effective_session_id(&self) -> String {
        non_empty(self.session_id.as_deref()).map_or_else(generate_session_id, str::to_string)
    }

    /// Check required fields and fill in defaults.
    ///
    /// `Text` must be present; an empty string is accepted.
    pub fn validate(self, session_id: String) -> AppResult<ValidatedMessage> {
        let text = self.text.ok_or(AppError::TextRequired)?;

        Ok(ValidatedMessage {
            text,
            user_name: non_empty(self.user_name.as_deref())
                .unwrap_or(DEFAULT_USER_NAME)
                .to_string(),
            source_name: non_empty(self.source_name.as_deref())
                .unwrap_or(DEFAULT_SOURCE_NAME)
                .to_string(),
            session_id,
            is_draft: self.is_draft.unwrap_or(false),
        })
    }
}

impl ValidatedMessage {
    /// Build the upstream body, injecting the configured domain name
    pub fn into_upstream(self, credentials: &Credentials<'_>) -> UpstreamMessage {
        UpstreamMessage {
            text: self.text,
            user_name: self.user_name,
            source_name: self.source_name,
            session_id: self.session_id,
            domain_name: credentials.domain_name.to_string(),
            is_draft: self.is_draft,
        }
    }
}

/// `session_<unix millis>`
pub fn generate_session_id() -> String {
    format!("session_{}", chrono::Utc::now().timestamp_millis())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
