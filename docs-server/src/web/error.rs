//! Handler error taxonomy and its HTTP mapping.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::content::FetchError;

/// Every way a handler can fail. Each variant maps to exactly one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("webhook secret not configured")]
    MissingSecret,

    #[error("no signature found")]
    MissingSignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Validation(String),

    #[error("failed to read request body")]
    BodyRead(#[source] axum::Error),

    #[error("failed to fetch markdown")]
    Upstream(#[from] FetchError),

    #[error("failed to encode response")]
    Encoding(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingSignature | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingSecret
            | ApiError::BodyRead(_)
            | ApiError::Upstream(_)
            | ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: "error",
            error: self.to_string(),
        };
        // Only the fixed display text goes out; sources stay in the logs.
        match json_response(status, &body) {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "error_response_encode_failed");
                (status, self.to_string()).into_response()
            }
        }
    }
}

/// Serialize `body` fully before building the response, so encoding failures
/// never produce a partial payload.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body)?;
    Ok((
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        bytes,
    )
        .into_response())
}
