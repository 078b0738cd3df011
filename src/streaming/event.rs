//! Upstream line classification and the normalized client event
//!
//! Each upstream line is classified into a tagged [`UpstreamLine`] first, and
//! only then turned into an [`OutboundEvent`] carrying the caller's session id.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Prefix of server-sent-event data lines
const DATA_PREFIX: &str = "data: ";

/// Marker some upstreams send to close the stream
const DONE_MARKER: &str = "[DONE]";

/// One normalized unit of the response streamed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEvent {
    pub ai_message: String,
    pub session_id: String,
    /// Absent on completion events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_followup: Option<bool>,
}

impl OutboundEvent {
    /// A message event
    pub fn message(ai_message: impl Into<String>, session_id: impl Into<String>, has_followup: bool) -> Self {
        Self {
            ai_message: ai_message.into(),
            session_id: session_id.into(),
            has_followup: Some(has_followup),
        }
    }

    /// The completion event forwarded for `[DONE]` or an empty data line
    pub fn completion(session_id: impl Into<String>) -> Self {
        Self {
            ai_message: String::new(),
            session_id: session_id.into(),
            has_followup: None,
        }
    }

    /// Format as `data: {json}\n\n`
    pub fn encode(&self) -> serde_json::Result<Bytes> {
        let json = serde_json::to_string(self)?;
        Ok(Bytes::from(format!("data: {}\n\n", json)))
    }
}

/// Result of classifying one upstream line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamLine {
    /// Whitespace only; nothing to emit
    Blank,
    /// `data: [DONE]` or `data:` with an empty payload
    Completion,
    /// Any non-null JSON value; fields missing from it read as defaults
    Structured { message: String, has_followup: bool },
    /// Anything that is not JSON (or is `null`), forwarded verbatim (trimmed)
    PlainText(String),
}

impl UpstreamLine {
    /// Attach the session id and produce the client event, if any
    pub fn into_event(self, session_id: &str) -> Option<OutboundEvent> {
        match self {
            UpstreamLine::Blank => None,
            UpstreamLine::Completion => Some(OutboundEvent::completion(session_id)),
            UpstreamLine::Structured {
                message,
                has_followup,
            } => Some(OutboundEvent::message(message, session_id, has_followup)),
            UpstreamLine::PlainText(text) => Some(OutboundEvent::message(text, session_id, false)),
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamLine::Blank => "blank",
            UpstreamLine::Completion => "completion",
            UpstreamLine::Structured { .. } => "structured",
            UpstreamLine::PlainText(_) => "plain_text",
        }
    }
}

/// Classify a single upstream line.
///
/// `data: ` lines read `ai_message` from their JSON payload. Bare lines are
/// parsed directly and accept either `ai_message` or `text`. Any other JSON
/// value yields an empty message. Lines that are not JSON, or are `null`, are
/// forwarded as plain text.
pub fn classify_line(line: &str) -> UpstreamLine {
    if line.trim().is_empty() {
        return UpstreamLine::Blank;
    }

    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        let payload = payload.trim();
        if payload.is_empty() || payload == DONE_MARKER {
            return UpstreamLine::Completion;
        }
        return parse_structured(payload, &["ai_message"])
            .unwrap_or_else(|| UpstreamLine::PlainText(payload.to_string()));
    }

    parse_structured(line, &["ai_message", "text"])
        .unwrap_or_else(|| UpstreamLine::PlainText(line.trim().to_string()))
}

/// Attempt to read a JSON value, taking the first non-empty string among
/// `message_fields` as the message.
///
/// Scalars and arrays carry no fields, so they parse to an empty message.
fn parse_structured(raw: &str, message_fields: &[&str]) -> Option<UpstreamLine> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if value.is_null() {
        return None;
    }

    let message = message_fields
        .iter()
        .filter_map(|field| value.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string();
    let has_followup = value
        .get("has_followup")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(UpstreamLine::Structured {
        message,
        has_followup,
    })
}
