//! Test utilities for the API module
//!
//! Shared helpers for building an AppState backed by a seeded in-memory
//! store, plus request/response plumbing for `Router::oneshot` tests.


use std::sync::Arc;
use std::time::Duration;

use crate::api::AppState;
use crate::config::Config;
use crate::coordinator::EmergencyCoordinator;
use crate::hub::BroadcastHub;
use crate::registry::ClientRegistry;
use crate::simulation::SimulationEngine;
use crate::store::TelemetryStore;

/// Create a test AppState with a freshly seeded store
pub(crate) fn create_test_app_state() -> AppState {
    let store = Arc::new(TelemetryStore::new());
    let registry = Arc::new(ClientRegistry::new());
    let hub = Arc::new(BroadcastHub::new(
        registry.clone(),
        Arc::new(SimulationEngine::new(store.clone())),
    ));
    let coordinator = Arc::new(EmergencyCoordinator::new(
        hub.clone(),
        Duration::from_millis(50),
    ));

    AppState {
        store,
        registry,
        hub,
        coordinator,
        allowed_origins: vec![],
        cors_disabled: true,
        config: Arc::new(Config::default()),
    }
}
