//! Error types for the wallet summary proxy.
//!
//! One taxonomy covers the whole request path: validation failures,
//! upstream HTTP failures, attempt timeouts and everything else. Each
//! variant carries its client-facing status code so handlers can return
//! errors directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while serving a summary request.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The `address` query parameter is missing or empty.
    #[error("missing address parameter")]
    MissingAddress,

    /// The upstream API answered with a non-success status.
    #[error("upstream request failed with status {status}")]
    UpstreamStatus { status: u16 },

    /// An upstream attempt exceeded its deadline.
    #[error("upstream request timed out")]
    Timeout,

    /// Network, body or JSON failure talking to the upstream.
    #[error("upstream request failed: {0}")]
    Unexpected(String),
}

impl ProxyError {
    /// The HTTP status this error surfaces as.
    ///
    /// Validation errors are the caller's fault (400), timeouts map to
    /// 504, upstream statuses are proxied through, and anything else is
    /// a plain 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingAddress => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamStatus { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether another attempt may be worth making.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProxyError::MissingAddress)
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convenience alias for fallible proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
