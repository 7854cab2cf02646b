// emergency_flow.rs
//
// Integration tests for the broadcast core: coordinator + hub + registry
// wired together, with raw channel receivers standing in for WebSocket
// clients. Wire-level coverage lives in the e2e-tests crate.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use uuid::Uuid;

use orbitdeck_ops_server::coordinator::EmergencyCoordinator;
use orbitdeck_ops_server::hub::BroadcastHub;
use orbitdeck_ops_server::protocol::{ClientCommand, ControlMessage};
use orbitdeck_ops_server::registry::{ClientId, ClientRegistry};
use orbitdeck_ops_server::simulation::SimulationEngine;
use orbitdeck_ops_server::store::TelemetryStore;

const RESTORATION_DELAY: Duration = Duration::from_millis(100);

struct Core {
    registry: Arc<ClientRegistry>,
    hub: Arc<BroadcastHub>,
    coordinator: Arc<EmergencyCoordinator>,
}

fn build_core() -> Core {
    let registry = Arc::new(ClientRegistry::new());
    let store = Arc::new(TelemetryStore::new());
    let hub = Arc::new(BroadcastHub::new(
        registry.clone(),
        Arc::new(SimulationEngine::new(store)),
    ));
    let coordinator = Arc::new(EmergencyCoordinator::new(hub.clone(), RESTORATION_DELAY));
    Core {
        registry,
        hub,
        coordinator,
    }
}

async fn connect(core: &Core) -> (ClientId, mpsc::UnboundedReceiver<Message>) {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();
    core.registry.add(id, tx).await;
    (id, rx)
}

/// Receive the next frame as parsed JSON, within a timeout
async fn next_json(rx: &mut mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed unexpectedly");
    match message {
        Message::Text(text) => serde_json::from_str(&text).expect("valid JSON frame"),
        other => panic!("expected text frame, got {:?}", other),
    }
}

/// Receive the next tagged control message, panicking on snapshots
async fn next_control(rx: &mut mpsc::UnboundedReceiver<Message>) -> ControlMessage {
    let json = next_json(rx).await;
    assert!(json.get("type").is_some(), "expected control message, got snapshot");
    serde_json::from_value(json).expect("valid control message")
}

#[tokio::test]
async fn test_emergency_reaches_every_connection_with_force_alarm() {
    let core = build_core();
    let (_, mut rx_a) = connect(&core).await;
    let (_, mut rx_b) = connect(&core).await;
    let (_, mut rx_c) = connect(&core).await;

    core.coordinator
        .handle_command(ClientCommand::TriggerEmergency)
        .await;

    for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
        let json = next_json(rx).await;
        assert_eq!(json["type"], "emergency_state");
        assert_eq!(json["emergencyMode"], true);
        assert_eq!(json["forceAlarm"], true);
    }
}

#[tokio::test]
async fn test_late_joiner_sees_emergency_before_first_snapshot() {
    let core = build_core();
    let (_, mut rx_a) = connect(&core).await;

    core.coordinator.trigger_emergency().await;
    let _ = next_json(&mut rx_a).await;

    // Late joiner handshake: replay first, then the initial snapshot
    let (late_id, mut late_rx) = connect(&core).await;
    core.coordinator.replay_state_to(late_id).await;
    core.hub.push_snapshot_to(late_id).await;

    let first = next_json(&mut late_rx).await;
    assert_eq!(first["type"], "emergency_state");
    assert_eq!(first["emergencyMode"], true);
    assert!(first.get("forceAlarm").is_none(), "replay carries no forceAlarm");

    let second = next_json(&mut late_rx).await;
    assert!(second.get("type").is_none(), "snapshot follows the replay");
    assert!(second["satellites"].is_array());
}

#[tokio::test]
async fn test_completion_ordering_holds_on_every_connection() {
    let core = build_core();
    let (_, mut rx_a) = connect(&core).await;
    let (_, mut rx_b) = connect(&core).await;

    core.coordinator.trigger_emergency().await;
    core.coordinator.trigger_restoration().await;

    for rx in [&mut rx_a, &mut rx_b] {
        assert_eq!(
            next_control(rx).await,
            ControlMessage::emergency_broadcast(true)
        );
        assert_eq!(next_control(rx).await, ControlMessage::restoration(true));
        // Ordering law: restoration ends strictly before emergency clears
        assert_eq!(next_control(rx).await, ControlMessage::restoration(false));
        assert_eq!(
            next_control(rx).await,
            ControlMessage::emergency_broadcast(false)
        );
    }
}

#[tokio::test]
async fn test_cancel_before_delay_suppresses_completion() {
    let core = build_core();
    let (_, mut rx) = connect(&core).await;

    core.coordinator.trigger_emergency().await;
    core.coordinator.trigger_restoration().await;
    core.coordinator.cancel_restoration().await;

    assert_eq!(
        next_control(&mut rx).await,
        ControlMessage::emergency_broadcast(true)
    );
    assert_eq!(next_control(&mut rx).await, ControlMessage::restoration(true));
    assert_eq!(next_control(&mut rx).await, ControlMessage::restoration(false));

    tokio::time::sleep(RESTORATION_DELAY * 3).await;
    assert!(
        rx.try_recv().is_err(),
        "no completion broadcast may follow a cancel"
    );

    let state = core.coordinator.state().await;
    assert!(state.emergency_active);
    assert!(!state.restoring);
}

#[tokio::test]
async fn test_removed_connection_receives_nothing_further() {
    let core = build_core();
    let (id_a, mut rx_a) = connect(&core).await;
    let (_, mut rx_b) = connect(&core).await;

    core.registry.remove(id_a).await;
    core.coordinator.trigger_emergency().await;

    let json = next_json(&mut rx_b).await;
    assert_eq!(json["type"], "emergency_state");

    // The registry dropped its sender, so the channel reports closed
    assert!(matches!(
        rx_a.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    ));
}

#[tokio::test]
async fn test_double_trigger_stays_in_emergency() {
    let core = build_core();
    let (_, mut rx) = connect(&core).await;

    core.coordinator
        .handle_command(ClientCommand::TriggerEmergency)
        .await;
    core.coordinator
        .handle_command(ClientCommand::TriggerEmergency)
        .await;

    for _ in 0..2 {
        let json = next_json(&mut rx).await;
        assert_eq!(json["emergencyMode"], true);
        assert_eq!(json["forceAlarm"], true);
    }

    let state = core.coordinator.state().await;
    assert!(state.emergency_active);
    assert!(!state.restoring);
}

/// The full end-to-end sequence from the session contract: trigger from
/// one client, late joiner handshake, restoration observed by both.
#[tokio::test]
async fn test_full_emergency_cycle_across_two_clients() {
    let core = build_core();

    // Client A connects and triggers the emergency
    let (id_a, mut rx_a) = connect(&core).await;
    core.coordinator.replay_state_to(id_a).await;
    core.hub.push_snapshot_to(id_a).await;
    let handshake = next_json(&mut rx_a).await;
    assert!(handshake.get("type").is_none(), "normal-state handshake is just a snapshot");

    core.coordinator
        .handle_command(ClientCommand::TriggerEmergency)
        .await;
    let json = next_json(&mut rx_a).await;
    assert_eq!(json["type"], "emergency_state");
    assert_eq!(json["emergencyMode"], true);
    assert_eq!(json["forceAlarm"], true);

    // Client B joins during the emergency
    let (id_b, mut rx_b) = connect(&core).await;
    core.coordinator.replay_state_to(id_b).await;
    core.hub.push_snapshot_to(id_b).await;

    let first = next_json(&mut rx_b).await;
    assert_eq!(first["type"], "emergency_state");
    assert_eq!(first["emergencyMode"], true);
    let second = next_json(&mut rx_b).await;
    assert!(second.get("type").is_none());

    // A starts restoration; both clients follow the whole sequence
    core.coordinator
        .handle_command(ClientCommand::TriggerRestoration)
        .await;

    for rx in [&mut rx_a, &mut rx_b] {
        assert_eq!(next_control(rx).await, ControlMessage::restoration(true));
        assert_eq!(next_control(rx).await, ControlMessage::restoration(false));
        assert_eq!(
            next_control(rx).await,
            ControlMessage::emergency_broadcast(false)
        );
    }

    let state = core.coordinator.state().await;
    assert!(!state.emergency_active);
    assert!(!state.restoring);
}
