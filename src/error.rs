//! Error types surfaced to the HTTP layer.
//!
//! Neither server recovers locally: handlers return these errors and
//! `IntoResponse` decides the status the caller sees.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::BoxError;

/// Failure of a single forwarded call.
///
/// A downstream that answers with any status (including 4xx/5xx) is not an
/// error; that response is relayed verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The downstream target is missing or malformed. Detected before any I/O.
    #[error("invalid downstream target '{target}': {reason}")]
    Configuration { target: String, reason: String },

    /// The downstream could not be reached (refused, DNS, reset, timeout).
    #[error("downstream unreachable at {url}: {source}")]
    DownstreamUnreachable {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::DownstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = match self {
            ForwardError::Configuration { .. } => "Downstream target misconfigured",
            ForwardError::DownstreamUnreachable { .. } => "Upstream request failed",
        };
        (self.status(), body).into_response()
    }
}

/// Failure of the nanoservice's call to its next hop.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("no next service configured")]
    NotConfigured,

    #[error("invalid next service url '{0}'")]
    InvalidUrl(String),

    #[error("next service unreachable: {0}")]
    Unreachable(#[source] BoxError),

    #[error("next service answered {0}")]
    Status(StatusCode),

    #[error("failed to read next service body: {0}")]
    Body(#[source] BoxError),
}

impl IntoResponse for ChainError {
    fn into_response(self) -> Response {
        let status = match self {
            ChainError::NotConfigured | ChainError::InvalidUrl(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ChainError::Unreachable(_) | ChainError::Status(_) | ChainError::Body(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        (status, self.to_string()).into_response()
    }
}
