//! Emergency / restoration coordinator
//!
//! The single authority over the process-wide emergency state. All
//! transitions and the broadcasts they cause run inside one mutex-guarded
//! critical section, so the ordered pair of completion broadcasts can
//! never be split by another command's broadcast. Per-connection delivery
//! goes through unbounded channels, which keeps the critical section free
//! of socket I/O.
//!
//! Transitions (any connected client may trigger any of them):
//!   Normal    --trigger_emergency-->   Emergency   (re-trigger reaffirms)
//!   Emergency --trigger_restoration--> Restoring   (completes after a delay)
//!   Restoring --cancel_restoration-->  Emergency
//!   Restoring --(delay elapses)-->     Normal
//!
//! There is no direct Emergency -> Normal path: only a completed
//! restoration clears the emergency flag.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::hub::BroadcastHub;
use crate::protocol::{ClientCommand, ControlMessage};
use crate::registry::ClientId;

/// Read-only view of the coordinator's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalState {
    pub emergency_active: bool,
    pub restoring: bool,
}

struct Inner {
    emergency_active: bool,
    restoring: bool,
    /// Bumped on every restoration start; a completion only applies if its
    /// cycle still matches, which makes cancellation race-free even when
    /// the delay has already elapsed.
    restoration_cycle: u64,
    pending_completion: Option<JoinHandle<()>>,
}

pub struct EmergencyCoordinator {
    inner: Mutex<Inner>,
    hub: Arc<BroadcastHub>,
    restoration_delay: Duration,
}

impl EmergencyCoordinator {
    pub fn new(hub: Arc<BroadcastHub>, restoration_delay: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                emergency_active: false,
                restoring: false,
                restoration_cycle: 0,
                pending_completion: None,
            }),
            hub,
            restoration_delay,
        }
    }

    /// Dispatch a parsed client command to the matching transition
    pub async fn handle_command(self: &Arc<Self>, command: ClientCommand) {
        match command {
            ClientCommand::TriggerEmergency => self.trigger_emergency().await,
            ClientCommand::TriggerRestoration => self.trigger_restoration().await,
            ClientCommand::CancelRestoration => self.cancel_restoration().await,
        }
    }

    /// Enter emergency mode and force every client's alarm on.
    ///
    /// Idempotent on state; the broadcast is always re-sent so a repeat
    /// trigger reaffirms the alarm on every device.
    pub async fn trigger_emergency(&self) {
        let mut inner = self.inner.lock().await;
        if inner.emergency_active {
            tracing::info!("Emergency re-triggered, reaffirming state");
        } else {
            tracing::warn!("Emergency triggered");
        }
        inner.emergency_active = true;
        self.hub
            .broadcast(&ControlMessage::emergency_broadcast(true))
            .await;
    }

    /// Start the timed restoration sequence. Ignored while one is already
    /// pending, so duplicate completion timers cannot exist.
    pub async fn trigger_restoration(self: &Arc<Self>) {
        let mut inner = self.inner.lock().await;
        if inner.restoring {
            tracing::debug!("Restoration already in progress, ignoring trigger");
            return;
        }

        inner.restoring = true;
        inner.restoration_cycle += 1;
        let cycle = inner.restoration_cycle;
        tracing::info!(cycle, "Restoration started");

        self.hub.broadcast(&ControlMessage::restoration(true)).await;

        let coordinator = Arc::clone(self);
        let delay = self.restoration_delay;
        inner.pending_completion = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.complete_restoration(cycle).await;
        }));
    }

    /// Abort the pending restoration; emergency mode stays active.
    /// Ignored when nothing is pending.
    pub async fn cancel_restoration(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.restoring {
            tracing::debug!("No restoration in progress, ignoring cancel");
            return;
        }

        if let Some(handle) = inner.pending_completion.take() {
            handle.abort();
        }
        inner.restoring = false;
        tracing::info!("Restoration cancelled");

        self.hub.broadcast(&ControlMessage::restoration(false)).await;
    }

    /// Delayed completion body. Stale wakeups (cancelled or superseded
    /// cycles) are dropped; a live one ends restoration and clears the
    /// emergency, in that broadcast order.
    async fn complete_restoration(&self, cycle: u64) {
        let mut inner = self.inner.lock().await;
        if !inner.restoring || inner.restoration_cycle != cycle {
            tracing::debug!(cycle, "Stale restoration completion dropped");
            return;
        }

        inner.restoring = false;
        inner.emergency_active = false;
        inner.pending_completion = None;
        tracing::info!(cycle, "Restoration completed, emergency cleared");

        // Ordering law: restoration-ended strictly before emergency-cleared
        self.hub.broadcast(&ControlMessage::restoration(false)).await;
        self.hub
            .broadcast(&ControlMessage::emergency_broadcast(false))
            .await;
    }

    /// Connect-time replay for late joiners: current emergency state first,
    /// then restoration state, each to this client only
    pub async fn replay_state_to(&self, client: ClientId) {
        let inner = self.inner.lock().await;
        if inner.emergency_active {
            self.hub
                .send_to(client, &ControlMessage::emergency_replay(true))
                .await;
        }
        if inner.restoring {
            self.hub
                .send_to(client, &ControlMessage::restoration(true))
                .await;
        }
    }

    pub async fn state(&self) -> GlobalState {
        let inner = self.inner.lock().await;
        GlobalState {
            emergency_active: inner.emergency_active,
            restoring: inner.restoring,
        }
    }
}
