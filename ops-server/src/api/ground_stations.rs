//! Ground station endpoint handler

use axum::{extract::State, Json};

use crate::{
    api::{AppState, ProblemDetails},
    models::GroundStation,
};

/// List all ground stations
pub async fn list_ground_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<GroundStation>>, ProblemDetails> {
    let span = tracing::info_span!("list_ground_stations");
    let _enter = span.enter();

    let stations = state.store.ground_stations().await;

    tracing::info!(count = stations.len(), "Successfully retrieved ground stations");

    Ok(Json(stations))
}
