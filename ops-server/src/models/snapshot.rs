use serde::{Deserialize, Serialize};

use super::{Activity, GroundStation, Mission, Satellite, TelemetrySample};

/// Full dashboard state pushed to WebSocket clients.
///
/// Deliberately carries no `type` field: viewers distinguish snapshots
/// from control messages by its absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub satellites: Vec<Satellite>,
    pub mission: Mission,
    pub ground_stations: Vec<GroundStation>,
    pub telemetry: TelemetrySample,
    pub activities: Vec<Activity>,
}
