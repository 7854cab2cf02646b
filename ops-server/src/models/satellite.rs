use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracked satellite state as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Satellite {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub orbit_class: OrbitClass,
    /// Orbital altitude in kilometers
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Downlink signal quality in percent
    pub signal_strength: f64,
    pub status: SatelliteStatus,
    /// Refreshed whenever the simulation touches this satellite
    pub last_contact: DateTime<Utc>,
}

/// Orbit classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrbitClass {
    Leo,
    Meo,
    Geo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SatelliteStatus {
    Active,
    Maintenance,
    Offline,
}
