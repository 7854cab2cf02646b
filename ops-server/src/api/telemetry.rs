//! Telemetry endpoint handler

use axum::{extract::State, Json};

use crate::{
    api::{AppState, ProblemDetails},
    models::TelemetrySample,
};

/// Get the most recent telemetry sample
pub async fn get_telemetry(
    State(state): State<AppState>,
) -> Result<Json<TelemetrySample>, ProblemDetails> {
    let span = tracing::info_span!("get_telemetry");
    let _enter = span.enter();

    match state.store.latest_telemetry().await {
        Some(telemetry) => {
            tracing::info!(sample_id = telemetry.id, "Successfully retrieved telemetry");
            Ok(Json(telemetry))
        }
        None => {
            tracing::warn!("No telemetry data found");
            Err(ProblemDetails::not_found("Telemetry data").with_instance("/api/telemetry"))
        }
    }
}
