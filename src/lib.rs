//! Lead Relay Library
//!
//! Server side of the Support360 contact form: accepts a lead submission,
//! forwards it to the Roistat lead API and relays the answer.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core relay logic.
//! - `integrations`: External service integrations.
//! - `app`: Router construction (CORS, tracing, body limit).
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `lead_models`: Inbound submission and outbound Roistat payload.
//! - `relay`: Validation pipeline and reply translation.
//! - `relay_models`: Response bodies returned to the caller.
//! - `roistat_client`: Roistat API client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lead_models;
pub mod relay;
pub mod relay_models;
pub mod roistat_client;
