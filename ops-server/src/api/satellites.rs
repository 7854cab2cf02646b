//! Satellite endpoint handlers
//!
//! List endpoint for the fleet plus the command write endpoint, which
//! records each accepted command as an activity feed entry.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{AppState, ProblemDetails},
    models::{ActivityKind, Satellite},
};

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

/// List all tracked satellites
pub async fn list_satellites(
    State(state): State<AppState>,
) -> Result<Json<Vec<Satellite>>, ProblemDetails> {
    let span = tracing::info_span!("list_satellites");
    let _enter = span.enter();

    let satellites = state.store.satellites().await;

    tracing::info!(count = satellites.len(), "Successfully retrieved satellites");

    Ok(Json(satellites))
}

/// Send a command to one satellite, logging it to the activity feed
pub async fn send_command(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ProblemDetails> {
    let span = tracing::info_span!("send_command", satellite_id = id);
    let _enter = span.enter();

    let satellite = match state.store.satellite(id).await {
        Some(satellite) => satellite,
        None => {
            tracing::warn!(satellite_id = id, "Satellite not found");
            return Err(ProblemDetails::not_found("Satellite")
                .with_instance(format!("/api/satellites/{}/command", id)));
        }
    };

    state
        .store
        .record_activity(
            format!("Command sent to {}: {}", satellite.name, request.command),
            ActivityKind::Info,
        )
        .await;

    tracing::info!(
        satellite = %satellite.name,
        command = %request.command,
        "Command recorded"
    );

    Ok(Json(CommandResponse {
        success: true,
        message: format!("Command \"{}\" sent to {}", request.command, satellite.name),
    }))
}
