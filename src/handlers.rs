use crate::config::Config;
use crate::errors::AppError;
use crate::relay::{self, Admission};
use crate::roistat_client::RoistatClient;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Roistat lead API, reused across requests.
    pub roistat: RoistatClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let roistat = RoistatClient::from_config(&config)?;
        Ok(Self { config, roistat })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-relay",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Lead relay endpoint, mounted on every path except `/health`.
///
/// Flow:
/// 1. OPTIONS answers 200 with an empty body; anything but POST is a 405.
/// 2. Decode and validate the submission (`name` and `phone` required).
/// 3. Resolve the Roistat credential.
/// 4. Forward the lead to Roistat (single attempt).
/// 5. Relay the upstream status and body.
///
/// Steps 1-3 never touch the network.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `method` - Request method.
/// * `body` - Raw request body; decoded here so malformed JSON maps to our own error body.
///
/// # Returns
///
/// * `Result<Response, AppError>` - The relayed Roistat reply or an error.
pub async fn handle_lead(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    let submission_id = Uuid::new_v4();
    let span = tracing::info_span!("lead", %submission_id, %method);

    async move {
        if relay::admit(&method)? == Admission::Preflight {
            return Ok(StatusCode::OK.into_response());
        }

        tracing::info!("📨 Received lead submission ({} bytes)", body.len());

        let payload = relay::prepare(&body, state.config.roistat_api_key.as_deref())?;
        let reply = state.roistat.add_lead(&payload).await?;
        let relayed = relay::translate(reply);

        if relayed.body.success {
            tracing::info!("✅ Lead accepted by Roistat ({})", relayed.status.as_u16());
        } else {
            tracing::warn!("⚠️  Roistat rejected lead ({})", relayed.status.as_u16());
        }

        Ok(relayed.into_response())
    }
    .instrument(span)
    .await
}
