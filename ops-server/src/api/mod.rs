//! OrbitDeck ops-server HTTP surface
//!
//! REST endpoints for the dashboard fixtures (satellites, mission, ground
//! stations, telemetry, activities) and the WebSocket endpoint for the
//! real-time push channel. Includes CORS configuration and request
//! tracing.

mod activities;
mod error;
mod ground_stations;
mod mission;
mod satellites;
mod telemetry;
mod websocket;

#[cfg(test)]
mod tests;

pub use error::{ApiResult, ProblemDetails};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

use crate::{
    config::Config, coordinator::EmergencyCoordinator, hub::BroadcastHub,
    registry::ClientRegistry, store::TelemetryStore,
};

use activities::list_activities;
use ground_stations::list_ground_stations;
use mission::get_mission;
use satellites::{list_satellites, send_command};
use telemetry::get_telemetry;
use websocket::websocket_handler;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TelemetryStore>,
    pub registry: Arc<ClientRegistry>,
    pub hub: Arc<BroadcastHub>,
    pub coordinator: Arc<EmergencyCoordinator>,
    pub allowed_origins: Vec<String>,
    pub cors_disabled: bool,
    pub config: Arc<Config>,
}

pub fn create_router(state: AppState) -> Router {
    // Create CORS layer - either permissive (all origins) or restricted based on config
    let cors = if state.cors_disabled {
        tracing::warn!(
            "CORS is DISABLED - allowing all origins. This should only be used in development!"
        );
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(
                state
                    .allowed_origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };

    // HTTP tracing layer for request/response logging
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "HTTP request started"
            );
        })
        .on_response(
            DefaultOnResponse::new()
                .level(tracing::Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/api/satellites", get(list_satellites))
        .route("/api/satellites/:id/command", post(send_command))
        .route("/api/mission", get(get_mission))
        .route("/api/ground-stations", get(list_ground_stations))
        .route("/api/telemetry", get(get_telemetry))
        .route("/api/activities", get(list_activities))
        .route("/ws", get(websocket_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
