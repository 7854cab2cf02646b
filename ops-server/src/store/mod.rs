//! In-memory telemetry store
//!
//! Holds the simulated fleet state snapshots are assembled from:
//! satellites, missions, ground stations, telemetry history, and the
//! activity feed. Seeded with fixture data at construction; nothing is
//! persisted across restarts.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{
    Activity, ActivityKind, GroundStation, Mission, MissionStatus, OrbitClass, Satellite,
    SatelliteStatus, StationStatus, TelemetryReading, TelemetrySample,
};

/// Retained telemetry samples (one per push; a day at the default cadence)
const MAX_TELEMETRY_SAMPLES: usize = 288;

/// Retained activity feed entries
const MAX_ACTIVITIES: usize = 100;

#[derive(Default)]
struct StoreState {
    satellites: HashMap<i64, Satellite>,
    missions: HashMap<i64, Mission>,
    ground_stations: HashMap<i64, GroundStation>,
    telemetry: Vec<TelemetrySample>,
    activities: Vec<Activity>,
    next_satellite_id: i64,
    next_mission_id: i64,
    next_station_id: i64,
    next_telemetry_id: i64,
    next_activity_id: i64,
}

pub struct TelemetryStore {
    state: RwLock<StoreState>,
}

impl TelemetryStore {
    /// Create a store seeded with the fixture fleet
    pub fn new() -> Self {
        let mut state = StoreState {
            next_satellite_id: 1,
            next_mission_id: 1,
            next_station_id: 1,
            next_telemetry_id: 1,
            next_activity_id: 1,
            ..Default::default()
        };
        seed(&mut state);
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn satellites(&self) -> Vec<Satellite> {
        let state = self.state.read().await;
        let mut satellites: Vec<_> = state.satellites.values().cloned().collect();
        satellites.sort_by_key(|s| s.id);
        satellites
    }

    pub async fn satellite(&self, id: i64) -> Option<Satellite> {
        let state = self.state.read().await;
        state.satellites.get(&id).cloned()
    }

    pub async fn create_satellite(
        &self,
        name: String,
        orbit_class: OrbitClass,
        altitude: f64,
        latitude: f64,
        longitude: f64,
        signal_strength: f64,
        status: SatelliteStatus,
    ) -> Satellite {
        let mut state = self.state.write().await;
        let id = state.next_satellite_id;
        state.next_satellite_id += 1;
        let satellite = Satellite {
            id,
            name,
            orbit_class,
            altitude,
            latitude,
            longitude,
            signal_strength,
            status,
            last_contact: Utc::now(),
        };
        state.satellites.insert(id, satellite.clone());
        satellite
    }

    /// Update a satellite's signal strength, refreshing its last contact.
    /// Returns None for an unknown id.
    pub async fn update_satellite(&self, id: i64, signal_strength: f64) -> Option<Satellite> {
        let mut state = self.state.write().await;
        let satellite = state.satellites.get_mut(&id)?;
        satellite.signal_strength = signal_strength;
        satellite.last_contact = Utc::now();
        Some(satellite.clone())
    }

    /// First mission with active status, if any
    pub async fn current_mission(&self) -> Option<Mission> {
        let state = self.state.read().await;
        state
            .missions
            .values()
            .find(|m| m.status == MissionStatus::Active)
            .cloned()
    }

    pub async fn ground_stations(&self) -> Vec<GroundStation> {
        let state = self.state.read().await;
        let mut stations: Vec<_> = state.ground_stations.values().cloned().collect();
        stations.sort_by_key(|s| s.id);
        stations
    }

    /// Newest telemetry sample by timestamp
    pub async fn latest_telemetry(&self) -> Option<TelemetrySample> {
        let state = self.state.read().await;
        state
            .telemetry
            .iter()
            .max_by_key(|t| t.timestamp)
            .cloned()
    }

    /// Record a new telemetry sample, assigning id and timestamp
    pub async fn record_telemetry(&self, reading: TelemetryReading) -> TelemetrySample {
        let mut state = self.state.write().await;
        let id = state.next_telemetry_id;
        state.next_telemetry_id += 1;
        let sample = TelemetrySample {
            id,
            uplink_strength: reading.uplink_strength,
            downlink_rate: reading.downlink_rate,
            network_latency: reading.network_latency,
            power_status: reading.power_status,
            thermal_status: reading.thermal_status,
            antenna_status: reading.antenna_status,
            positioning_status: reading.positioning_status,
            timestamp: Utc::now(),
        };
        state.telemetry.push(sample.clone());
        if state.telemetry.len() > MAX_TELEMETRY_SAMPLES {
            let excess = state.telemetry.len() - MAX_TELEMETRY_SAMPLES;
            state.telemetry.drain(..excess);
        }
        sample
    }

    /// Most recent activities, newest first
    pub async fn recent_activities(&self, limit: usize) -> Vec<Activity> {
        let state = self.state.read().await;
        let mut activities = state.activities.clone();
        // Ids break timestamp ties so burst-recorded entries stay ordered
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        activities.truncate(limit);
        activities
    }

    /// Append an activity feed entry
    pub async fn record_activity(&self, message: String, kind: ActivityKind) -> Activity {
        let mut state = self.state.write().await;
        let id = state.next_activity_id;
        state.next_activity_id += 1;
        let activity = Activity {
            id,
            message,
            kind,
            timestamp: Utc::now(),
        };
        state.activities.push(activity.clone());
        if state.activities.len() > MAX_ACTIVITIES {
            let excess = state.activities.len() - MAX_ACTIVITIES;
            state.activities.drain(..excess);
        }
        activity
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(state: &mut StoreState) {
    let now = Utc::now();

    let satellites = [
        ("SAT-2847", OrbitClass::Leo, 408.0, 45.5, -122.6, 98.7),
        ("SAT-1903", OrbitClass::Geo, 35786.0, 0.0, -75.0, 94.2),
        ("SAT-4201", OrbitClass::Meo, 20200.0, 30.2, 45.8, 87.1),
    ];
    for (name, orbit_class, altitude, latitude, longitude, signal_strength) in satellites {
        let id = state.next_satellite_id;
        state.next_satellite_id += 1;
        state.satellites.insert(
            id,
            Satellite {
                id,
                name: name.to_string(),
                orbit_class,
                altitude,
                latitude,
                longitude,
                signal_strength,
                status: SatelliteStatus::Active,
                last_contact: now,
            },
        );
    }

    let mission_id = state.next_mission_id;
    state.next_mission_id += 1;
    state.missions.insert(
        mission_id,
        Mission {
            id: mission_id,
            name: "Global Satellite Network".to_string(),
            status: MissionStatus::Active,
            start_time: now
                - Duration::hours(47)
                - Duration::minutes(23)
                - Duration::seconds(15),
            active_satellites: 47,
            in_transit: 3,
            maintenance: 2,
        },
    );

    let stations = [
        ("Houston, TX", "United States", StationStatus::Online, 29.7604, -95.3698),
        ("Kourou, French Guiana", "French Guiana", StationStatus::Online, 5.1662, -52.6880),
        ("Baikonur, Kazakhstan", "Kazakhstan", StationStatus::Standby, 45.9650, 63.3050),
    ];
    for (name, location, status, latitude, longitude) in stations {
        let id = state.next_station_id;
        state.next_station_id += 1;
        state.ground_stations.insert(
            id,
            GroundStation {
                id,
                name: name.to_string(),
                location: location.to_string(),
                status,
                latitude,
                longitude,
            },
        );
    }

    let telemetry_id = state.next_telemetry_id;
    state.next_telemetry_id += 1;
    state.telemetry.push(TelemetrySample {
        id: telemetry_id,
        uplink_strength: 92.4,
        downlink_rate: 2.4,
        network_latency: 47,
        power_status: "optimal".to_string(),
        thermal_status: "normal".to_string(),
        antenna_status: "caution".to_string(),
        positioning_status: "locked".to_string(),
        timestamp: now,
    });

    let activities = [
        ("SAT-2847 orbit adjustment completed", ActivityKind::Success),
        ("Data download from SAT-1903", ActivityKind::Info),
        ("Connection established SAT-4201", ActivityKind::Success),
    ];
    for (index, (message, kind)) in activities.into_iter().enumerate() {
        let id = state.next_activity_id;
        state.next_activity_id += 1;
        state.activities.push(Activity {
            id,
            message: message.to_string(),
            kind,
            timestamp: now - Duration::minutes(index as i64 + 1),
        });
    }
}
