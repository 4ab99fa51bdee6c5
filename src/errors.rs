use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::relay_models::RelayResponse;

/// Caller-facing message for a malformed or wrongly shaped body.
pub const INVALID_JSON: &str = "Invalid JSON received";
/// Caller-facing message when `name` or `phone` is missing or blank.
pub const NAME_AND_PHONE_REQUIRED: &str = "Name and phone are required";
/// Caller-facing message for transport failures talking to Roistat.
pub const UPSTREAM_UNREACHABLE: &str = "Failed to connect to Roistat API";

/// Errors raised by the lead relay before or while calling Roistat.
///
/// Upstream application errors (non-2xx replies, non-JSON bodies) are not
/// represented here: those are relayed to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request method other than POST or OPTIONS.
    MethodNotAllowed,
    /// Invalid client input. Carries the message returned to the caller.
    BadRequest(String),
    /// Server-side misconfiguration, e.g. a missing credential.
    Configuration(String),
    /// Roistat could not be reached (connect, DNS, timeout, body read).
    UpstreamTransport(String),
}

impl AppError {
    pub fn invalid_json() -> Self {
        AppError::BadRequest(INVALID_JSON.to_string())
    }

    pub fn missing_required_fields() -> Self {
        AppError::BadRequest(NAME_AND_PHONE_REQUIRED.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::UpstreamTransport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Configuration(msg) => write!(f, "Server configuration error: {}", msg),
            AppError::UpstreamTransport(msg) => write!(f, "{}: {}", UPSTREAM_UNREACHABLE, msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to its status code and `{success:false, error, details?}` body.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::MethodNotAllowed => RelayResponse::failure("Method Not Allowed"),
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected lead submission: {}", msg);
                RelayResponse::failure(msg)
            }
            AppError::Configuration(msg) => {
                tracing::error!("Critical: server configuration error: {}", msg);
                RelayResponse::failure(format!("Server configuration error: {}", msg))
            }
            AppError::UpstreamTransport(details) => {
                tracing::error!("Error connecting to Roistat API: {}", details);
                RelayResponse::failure(UPSTREAM_UNREACHABLE).with_details(details)
            }
        };

        body.into_response_with(status)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamTransport(err.to_string())
    }
}
