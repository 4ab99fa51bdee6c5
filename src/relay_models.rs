use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Content type of every JSON body the relay writes.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// JSON body returned to the landing page.
///
/// Exactly one of `data`/`raw_response` is set for relayed upstream replies;
/// `error` (and for transport failures `details`) for local failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayResponse {
    pub fn data(success: bool, data: Value) -> Self {
        Self {
            success,
            data: Some(data),
            raw_response: None,
            error: None,
            details: None,
        }
    }

    pub fn raw(success: bool, raw_response: String) -> Self {
        Self {
            success,
            data: None,
            raw_response: Some(raw_response),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            raw_response: None,
            error: Some(error.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Serializes the body with the relay's JSON content type.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        match serde_json::to_vec(&self) {
            Ok(bytes) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize relay response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// A relayed response together with the status code to answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: StatusCode,
    pub body: RelayResponse,
}

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        self.body.into_response_with(self.status)
    }
}
