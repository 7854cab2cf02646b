use serde::{Deserialize, Serialize};

/// Ground station listed on the network map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundStation {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub status: StationStatus,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Online,
    Offline,
    Standby,
}
