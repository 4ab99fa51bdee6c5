use crate::config::Config;
use crate::errors::AppError;
use crate::lead_models::LeadPayload;
use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Body of a Roistat reply.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not valid JSON and is kept as text.
    Raw(String),
}

/// Status and body of a reply that made it back from Roistat.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: UpstreamBody,
}

/// Client for the Roistat lead-creation API.
#[derive(Clone)]
pub struct RoistatClient {
    client: reqwest::Client,
    url: String,
}

impl RoistatClient {
    /// Creates a new `RoistatClient`.
    ///
    /// # Arguments
    ///
    /// * `url` - Full URL of the `leads/add` endpoint.
    /// * `user_agent` - Value of the `User-Agent` header.
    /// * `timeout` - Total timeout of one call, connect included.
    pub fn new(url: String, user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to create Roistat client: {}", e))
            })?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.roistat_api_url.clone(),
            crate::config::USER_AGENT,
            config.roistat_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts one lead to Roistat. Never retried.
    ///
    /// Any status code is a successful call here; only transport failures
    /// (connect, DNS, timeout, reading the body) are errors.
    pub async fn add_lead(&self, payload: &LeadPayload) -> Result<UpstreamReply, AppError> {
        tracing::info!("Sending lead to Roistat: {}", self.url);

        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        let text = response.text().await?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(json) => UpstreamBody::Json(json),
            Err(_) => {
                tracing::warn!(
                    "Received non-JSON response from Roistat API. Status: {}, Body: {}",
                    status.as_u16(),
                    text
                );
                UpstreamBody::Raw(text)
            }
        };

        tracing::info!("Roistat responded with status {}", status.as_u16());
        Ok(UpstreamReply { status, body })
    }
}
