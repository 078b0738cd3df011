//! Relay endpoint
//!
//! Accepts a chat message from a browser client, forwards it upstream with
//! the server-held credentials and streams the normalized events back.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, Instrument};

use crate::{
    error::AppError,
    message::InboundMessage,
    proxy::logging::RelayContext,
    routes::metrics::record_request,
    streaming::{relay_events, StreamTranslator},
    AppState,
};

/// Answer CORS preflight requests
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Reject every method other than `POST` and `OPTIONS`
pub async fn method_not_allowed() -> AppError {
    record_request("method_not_allowed");
    AppError::MethodNotAllowed
}

/// Handle a relayed chat message
///
/// Validation and configuration failures are answered with a JSON error
/// before the upstream is contacted. A non-success upstream status is
/// propagated as-is. Any other failure before streaming starts is answered
/// with a single apology event so the client always sees a well-formed
/// response for its session.
pub async fn relay_message(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let inbound = InboundMessage::from_body(&body).inspect_err(|_| record_request("invalid"))?;
    let session_id = inbound.effective_session_id();
    let message = inbound
        .validate(session_id.clone())
        .inspect_err(|_| record_request("invalid"))?;

    let credentials = state.config.credentials().map_err(|missing| {
        error!(missing = %missing, "Relay credentials are not configured");
        record_request("misconfigured");
        AppError::Configuration(missing)
    })?;

    let ctx = RelayContext::new(state.upstream.name(), &session_id);
    ctx.log_request_start(message.text.len(), message.is_draft);

    let upstream_message = message.into_upstream(&credentials);
    let upstream = match state
        .upstream
        .open_stream(credentials.api_key, &upstream_message)
        .instrument(ctx.create_span())
        .await
    {
        Ok(stream) => stream,
        Err(AppError::UpstreamStatus(status)) => {
            ctx.log_upstream_response(status.as_u16());
            record_request("upstream_error");
            return Err(AppError::UpstreamStatus(status));
        }
        Err(e) => {
            ctx.log_error(&e.to_string());
            record_request("failed");
            return Err(AppError::Interrupted { session_id });
        }
    };

    ctx.log_upstream_response(StatusCode::OK.as_u16());
    record_request("streaming");

    let translator = StreamTranslator::new(session_id, state.config.max_pending_line_bytes);
    let events = relay_events(upstream, translator, state.config.upstream_read_timeout, ctx);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(events),
    )
        .into_response())
}
