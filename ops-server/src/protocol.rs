//! Wire protocol for the dashboard WebSocket channel
//!
//! Two message families travel over one socket: tagged control messages
//! (discriminated by a `type` field) and the untagged telemetry snapshot.
//! Viewers rely on the absence of `type` to recognize a snapshot, so the
//! snapshot model must never grow that field.

use serde::{Deserialize, Serialize};

/// Server → client control message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Process-wide emergency flag.
    ///
    /// `force_alarm` is attached on genuine broadcasts to make every
    /// receiving client start its local alarm regardless of prior state.
    /// The connect-time replay omits it.
    #[serde(rename_all = "camelCase")]
    EmergencyState {
        emergency_mode: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        force_alarm: Option<bool>,
    },
    /// Restoration sequence progress.
    #[serde(rename_all = "camelCase")]
    RestorationState { is_restoring: bool },
}

impl ControlMessage {
    /// Emergency broadcast carrying the force-alarm flag.
    pub fn emergency_broadcast(emergency_mode: bool) -> Self {
        Self::EmergencyState {
            emergency_mode,
            force_alarm: Some(true),
        }
    }

    /// Emergency state for the connect-time replay (no force-alarm).
    pub fn emergency_replay(emergency_mode: bool) -> Self {
        Self::EmergencyState {
            emergency_mode,
            force_alarm: None,
        }
    }

    pub fn restoration(is_restoring: bool) -> Self {
        Self::RestorationState { is_restoring }
    }
}

/// Client → server command. Anything that does not parse into one of
/// these shapes is logged and dropped without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    TriggerEmergency,
    TriggerRestoration,
    CancelRestoration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_broadcast_wire_shape() {
        let msg = ControlMessage::emergency_broadcast(true);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "emergency_state");
        assert_eq!(json["emergencyMode"], true);
        assert_eq!(json["forceAlarm"], true);
    }

    #[test]
    fn test_emergency_replay_omits_force_alarm() {
        let msg = ControlMessage::emergency_replay(true);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "emergency_state");
        assert_eq!(json["emergencyMode"], true);
        assert!(json.get("forceAlarm").is_none());
    }

    #[test]
    fn test_restoration_wire_shape() {
        let msg = ControlMessage::restoration(false);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "restoration_state");
        assert_eq!(json["isRestoring"], false);
    }

    #[test]
    fn test_client_command_parsing() {
        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"trigger_emergency"}"#).unwrap();
        assert_eq!(cmd, ClientCommand::TriggerEmergency);

        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"trigger_restoration"}"#).unwrap();
        assert_eq!(cmd, ClientCommand::TriggerRestoration);

        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"cancel_restoration"}"#).unwrap();
        assert_eq!(cmd, ClientCommand::CancelRestoration);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"self_destruct"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>(r#"{"hello":"world"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>("not json").is_err());
    }
}
