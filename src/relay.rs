//! Lead relay pipeline: request validation, payload construction and
//! translation of the Roistat reply.

use axum::http::Method;

use crate::errors::AppError;
use crate::lead_models::{LeadPayload, LeadSubmission};
use crate::relay_models::{RelayReply, RelayResponse};
use crate::roistat_client::{UpstreamBody, UpstreamReply};

/// Message of the configuration error raised when no credential is set.
pub const MISSING_API_KEY: &str = "ROISTAT_API_KEY is missing";

/// What to do with an incoming request, decided from its method alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// CORS pre-flight: answer 200 with an empty body.
    Preflight,
    /// POST: run the lead pipeline.
    Submit,
}

/// Step 1: only POST submits a lead; OPTIONS is a pre-flight.
pub fn admit(method: &Method) -> Result<Admission, AppError> {
    if *method == Method::OPTIONS {
        Ok(Admission::Preflight)
    } else if *method == Method::POST {
        Ok(Admission::Submit)
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

/// Steps 2-4: decode, validate, resolve the credential, build the payload.
///
/// Runs entirely before any outbound call, so every error here guarantees
/// Roistat was not contacted.
pub fn prepare(body: &[u8], api_key: Option<&str>) -> Result<LeadPayload, AppError> {
    let lead = LeadSubmission::from_slice(body)?.validate()?;

    let api_key = api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AppError::Configuration(MISSING_API_KEY.to_string()))?;

    Ok(LeadPayload::build(api_key, lead))
}

/// Relays the upstream status; `success` is true iff it is 2xx.
pub fn translate(reply: UpstreamReply) -> RelayReply {
    let success = reply.status.is_success();
    let body = match reply.body {
        UpstreamBody::Json(data) => RelayResponse::data(success, data),
        UpstreamBody::Raw(text) => RelayResponse::raw(success, text),
    };

    RelayReply {
        status: reply.status,
        body,
    }
}
