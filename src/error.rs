//! Error types for the relay
//!
//! Every failure that happens before the event stream starts is rendered as a
//! small JSON body with a generic message. Details only go to the logs.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::streaming::OutboundEvent;

/// Apology sent when the relay fails before it could start streaming
pub const HANDLER_FAILURE_MESSAGE: &str =
    "I apologize, but I'm having trouble responding right now. Please try again.";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Access denied: Unauthorized domain")]
    AccessDenied,

    #[error("Text is required")]
    TextRequired,

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing configuration value: {0}")]
    Configuration(&'static str),

    #[error("Upstream responded with status {0}")]
    UpstreamStatus(StatusCode),

    /// The handler failed outside the streaming phase; the client still gets
    /// a well-formed event for its session.
    #[error("Relay interrupted for session {session_id}")]
    Interrupted { session_id: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    /// Status and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied: Unauthorized domain"),
            AppError::TextRequired => (StatusCode::BAD_REQUEST, "Text is required"),
            AppError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Service configuration error")
            }
            AppError::UpstreamStatus(status) => {
                (*status, "Failed to get response from AI service")
            }
            AppError::HttpError(_) => {
                (StatusCode::BAD_GATEWAY, "Failed to get response from AI service")
            }
            AppError::Interrupted { .. } | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Interrupted { session_id } = &self {
            let event = OutboundEvent::message(HANDLER_FAILURE_MESSAGE, session_id.clone(), false);
            match event.encode() {
                Ok(body) => {
                    return (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], body)
                        .into_response();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode fallback event");
                }
            }
        }

        let (status, message) = self.status_and_message();
        let body = ErrorResponse {
            error: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
