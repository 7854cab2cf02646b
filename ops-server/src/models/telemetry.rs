use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded telemetry sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub id: i64,
    /// Uplink signal quality in percent
    pub uplink_strength: f64,
    /// Downlink data rate in Gbps
    pub downlink_rate: f64,
    /// Round-trip latency in milliseconds
    pub network_latency: i64,
    pub power_status: String,
    pub thermal_status: String,
    pub antenna_status: String,
    pub positioning_status: String,
    pub timestamp: DateTime<Utc>,
}

/// A telemetry reading before the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct TelemetryReading {
    pub uplink_strength: f64,
    pub downlink_rate: f64,
    pub network_latency: i64,
    pub power_status: String,
    pub thermal_status: String,
    pub antenna_status: String,
    pub positioning_status: String,
}

impl From<&TelemetrySample> for TelemetryReading {
    fn from(sample: &TelemetrySample) -> Self {
        Self {
            uplink_strength: sample.uplink_strength,
            downlink_rate: sample.downlink_rate,
            network_latency: sample.network_latency,
            power_status: sample.power_status.clone(),
            thermal_status: sample.thermal_status.clone(),
            antenna_status: sample.antenna_status.clone(),
            positioning_status: sample.positioning_status.clone(),
        }
    }
}
