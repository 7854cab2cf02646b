//! Mission endpoint handler

use axum::{extract::State, Json};

use crate::{
    api::{AppState, ProblemDetails},
    models::Mission,
};

/// Get the currently active mission
pub async fn get_mission(State(state): State<AppState>) -> Result<Json<Mission>, ProblemDetails> {
    let span = tracing::info_span!("get_mission");
    let _enter = span.enter();

    match state.store.current_mission().await {
        Some(mission) => {
            tracing::info!(mission = %mission.name, "Successfully retrieved mission");
            Ok(Json(mission))
        }
        None => {
            tracing::warn!("No active mission found");
            Err(ProblemDetails::not_found("Active mission").with_instance("/api/mission"))
        }
    }
}
