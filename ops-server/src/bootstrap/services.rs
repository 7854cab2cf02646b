//! Service wiring
//!
//! Builds the store, simulation engine, connection registry, broadcast
//! hub, and emergency coordinator in dependency order.

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::coordinator::EmergencyCoordinator;
use crate::hub::BroadcastHub;
use crate::registry::ClientRegistry;
use crate::simulation::SimulationEngine;
use crate::store::TelemetryStore;

pub struct ServiceRegistry {
    pub store: Arc<TelemetryStore>,
    pub registry: Arc<ClientRegistry>,
    pub hub: Arc<BroadcastHub>,
    pub coordinator: Arc<EmergencyCoordinator>,
}

pub async fn setup(config: &Config) -> Result<ServiceRegistry> {
    let store = Arc::new(TelemetryStore::new());
    tracing::info!(
        satellites = store.satellites().await.len(),
        ground_stations = store.ground_stations().await.len(),
        "Telemetry store seeded"
    );

    let simulation = Arc::new(SimulationEngine::new(store.clone()));

    let registry = Arc::new(ClientRegistry::new());
    tracing::info!("Client registry initialized");

    let hub = Arc::new(BroadcastHub::new(registry.clone(), simulation));
    tracing::info!(
        snapshot_interval_secs = config.realtime.snapshot_interval_secs,
        "Broadcast hub initialized"
    );

    let coordinator = Arc::new(EmergencyCoordinator::new(
        hub.clone(),
        config.realtime.restoration_delay(),
    ));
    tracing::info!(
        restoration_delay_secs = config.realtime.restoration_delay_secs,
        "Emergency coordinator initialized"
    );

    Ok(ServiceRegistry {
        store,
        registry,
        hub,
        coordinator,
    })
}
