use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mission summary shown in the dashboard header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub status: MissionStatus,
    pub start_time: DateTime<Utc>,
    pub active_satellites: i64,
    pub in_transit: i64,
    pub maintenance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Completed,
    Planned,
}
