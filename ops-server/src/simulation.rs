//! Snapshot assembly and simulated telemetry drift
//!
//! The simulation tick rides on snapshot assembly: every `snapshot()` call
//! first drifts the stored telemetry and satellite signal strengths, then
//! bundles the fresh state for delivery. The `SnapshotSource` trait is the
//! seam the broadcast hub depends on, so hub tests can substitute a mock
//! provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;

use crate::models::{TelemetryReading, TelemetrySnapshot};
use crate::store::TelemetryStore;

/// Activities included in each snapshot
const SNAPSHOT_ACTIVITY_LIMIT: usize = 5;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Produce one fresh snapshot of the current fleet state
    async fn snapshot(&self) -> Result<TelemetrySnapshot>;
}

pub struct SimulationEngine {
    store: Arc<TelemetryStore>,
}

impl SimulationEngine {
    pub fn new(store: Arc<TelemetryStore>) -> Self {
        Self { store }
    }

    /// Drift the latest telemetry sample within its operating bands and
    /// record the result as a new sample
    async fn drift_telemetry(&self) -> Result<()> {
        let current = match self.store.latest_telemetry().await {
            Some(sample) => sample,
            None => return Ok(()),
        };

        let mut reading = TelemetryReading::from(&current);
        {
            // Scope the rng so the future stays Send
            let mut rng = rand::thread_rng();
            reading.uplink_strength =
                (reading.uplink_strength + rng.gen_range(-0.75..=0.75)).clamp(88.0, 98.0);
            reading.downlink_rate =
                (reading.downlink_rate + rng.gen_range(-0.1..=0.1)).clamp(2.0, 3.0);
            reading.network_latency = (reading.network_latency
                + rng.gen_range(-5.0f64..=5.0).floor() as i64)
                .clamp(30, 80);
        }

        self.store.record_telemetry(reading).await;
        Ok(())
    }

    /// Drift every satellite's signal strength within [85, 99]
    async fn drift_satellites(&self) {
        let satellites = self.store.satellites().await;

        let drifted: Vec<(i64, f64)> = {
            let mut rng = rand::thread_rng();
            satellites
                .iter()
                .map(|s| {
                    let strength =
                        (s.signal_strength + rng.gen_range(-1.0..=1.0)).clamp(85.0, 99.0);
                    (s.id, strength)
                })
                .collect()
        };

        for (id, strength) in drifted {
            self.store.update_satellite(id, strength).await;
        }
    }
}

#[async_trait]
impl SnapshotSource for SimulationEngine {
    async fn snapshot(&self) -> Result<TelemetrySnapshot> {
        self.drift_telemetry().await?;
        self.drift_satellites().await;

        let mission = self
            .store
            .current_mission()
            .await
            .context("no active mission for snapshot")?;
        let telemetry = self
            .store
            .latest_telemetry()
            .await
            .context("no telemetry sample for snapshot")?;

        Ok(TelemetrySnapshot {
            satellites: self.store.satellites().await,
            mission,
            ground_stations: self.store.ground_stations().await,
            telemetry,
            activities: self.store.recent_activities(SNAPSHOT_ACTIVITY_LIMIT).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_assembles_full_bundle() {
        let store = Arc::new(TelemetryStore::new());
        let engine = SimulationEngine::new(store.clone());

        let snapshot = engine.snapshot().await.unwrap();

        assert_eq!(snapshot.satellites.len(), 3);
        assert_eq!(snapshot.mission.name, "Global Satellite Network");
        assert_eq!(snapshot.ground_stations.len(), 3);
        assert_eq!(snapshot.activities.len(), 3);
        // The drifted sample is recorded, so the snapshot carries a new id
        assert_eq!(snapshot.telemetry.id, 2);
    }

    #[tokio::test]
    async fn test_snapshot_has_no_type_field() {
        let store = Arc::new(TelemetryStore::new());
        let engine = SimulationEngine::new(store);

        let snapshot = engine.snapshot().await.unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert!(json.get("type").is_none());
        assert!(json["satellites"].is_array());
        assert!(json["groundStations"].is_array());
    }

    #[tokio::test]
    async fn test_drift_stays_within_bands() {
        let store = Arc::new(TelemetryStore::new());
        let engine = SimulationEngine::new(store.clone());

        for _ in 0..50 {
            engine.snapshot().await.unwrap();
        }

        let telemetry = store.latest_telemetry().await.unwrap();
        assert!((88.0..=98.0).contains(&telemetry.uplink_strength));
        assert!((2.0..=3.0).contains(&telemetry.downlink_rate));
        assert!((30..=80).contains(&telemetry.network_latency));

        for satellite in store.satellites().await {
            assert!((85.0..=99.0).contains(&satellite.signal_strength));
        }
    }

    #[tokio::test]
    async fn test_drift_refreshes_satellite_contact() {
        let store = Arc::new(TelemetryStore::new());
        let engine = SimulationEngine::new(store.clone());
        let before = store.satellite(1).await.unwrap().last_contact;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        engine.snapshot().await.unwrap();

        assert!(store.satellite(1).await.unwrap().last_contact > before);
    }
}
