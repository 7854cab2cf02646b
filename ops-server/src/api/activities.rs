//! Activity feed endpoint handler

use axum::{extract::State, Json};

use crate::{
    api::{AppState, ProblemDetails},
    models::Activity,
};

/// Activities returned by the REST surface
const ACTIVITY_LIMIT: usize = 10;

/// List the most recent activity feed entries, newest first
pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Activity>>, ProblemDetails> {
    let span = tracing::info_span!("list_activities");
    let _enter = span.enter();

    let activities = state.store.recent_activities(ACTIVITY_LIMIT).await;

    tracing::info!(count = activities.len(), "Successfully retrieved activities");

    Ok(Json(activities))
}
