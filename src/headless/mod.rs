//! Headless mode - JSON event output for scripting and E2E tests
//!
//! Instead of drawing the panel, headless mode writes one JSON object per
//! line (NDJSON) to stdout for every engine event, and reads commands from
//! stdin.
//!
//! # Event Format
//!
//! Every line carries an `"event"` field naming its type. When
//! `ui.show_timestamps` is set, events also carry a millisecond
//! `"timestamp"`.
//!
//! ```json
//! {"event":"ready","host":"ws://localhost:8080/eel","timestamp":1704700001000}
//! {"event":"devices","devices":[{"id":"SELF","status":"up"}],"timestamp":1704700002000}
//! {"event":"output","chunk":"foo","timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use routerlab_app::EngineEvent;
use routerlab_core::{ComparePhase, DeviceRecord};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Engine is up and reading commands
    Ready {
        host: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Full device list after any registry change
    Devices {
        devices: Vec<DeviceRecord>,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Compare session phase or save availability changed
    Phase {
        phase: ComparePhase,
        can_save: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// One `update_output` chunk
    Output {
        chunk: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Host connection state, as shown in the TUI header
    Bridge {
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    Shutdown {
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
}

impl HeadlessEvent {
    /// Write this event as one line of JSON to stdout
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                if let Err(e) = writeln!(handle, "{}", json).and_then(|_| handle.flush()) {
                    error!("Failed to write headless event: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize headless event: {}", e),
        }
    }

    fn stamp(timestamps: bool) -> Option<i64> {
        timestamps.then(|| Utc::now().timestamp_millis())
    }

    pub fn ready(host: &str, timestamps: bool) -> Self {
        HeadlessEvent::Ready {
            host: host.to_string(),
            timestamp: Self::stamp(timestamps),
        }
    }

    /// Map an engine event to its headless line
    pub fn from_engine_event(event: EngineEvent, timestamps: bool) -> Self {
        let timestamp = Self::stamp(timestamps);
        match event {
            EngineEvent::DevicesChanged { devices } => HeadlessEvent::Devices { devices, timestamp },
            EngineEvent::PhaseChanged {
                new_phase, can_save, ..
            } => HeadlessEvent::Phase {
                phase: new_phase,
                can_save,
                timestamp,
            },
            EngineEvent::OutputAppended { chunk } => HeadlessEvent::Output { chunk, timestamp },
            EngineEvent::Error { message } => HeadlessEvent::Error { message, timestamp },
            EngineEvent::BridgeStatusChanged { status } => HeadlessEvent::Bridge {
                status: status.label(),
                timestamp,
            },
            EngineEvent::Shutdown => HeadlessEvent::Shutdown { timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routerlab_app::BridgeStatus;
    use routerlab_core::DeviceStatus;
    use serde_json::Value;

    fn to_json(event: &HeadlessEvent) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn test_devices_serialization() {
        let event = HeadlessEvent::from_engine_event(
            EngineEvent::DevicesChanged {
                devices: vec![DeviceRecord {
                    id: "dev-1".into(),
                    address: Some("10.0.0.2".into()),
                    status: DeviceStatus::Down,
                }],
            },
            false,
        );

        let json = to_json(&event);
        assert_eq!(json["event"], "devices");
        assert_eq!(json["devices"][0]["id"], "dev-1");
        assert_eq!(json["devices"][0]["address"], "10.0.0.2");
        assert_eq!(json["devices"][0]["status"], "down");
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_phase_serialization() {
        let event = HeadlessEvent::from_engine_event(
            EngineEvent::PhaseChanged {
                old_phase: ComparePhase::Running,
                new_phase: ComparePhase::Stopped,
                can_save: true,
            },
            true,
        );

        let json = to_json(&event);
        assert_eq!(json["event"], "phase");
        assert_eq!(json["phase"], "stopped");
        assert_eq!(json["can_save"], true);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_output_and_error_serialization() {
        let output = to_json(&HeadlessEvent::from_engine_event(
            EngineEvent::OutputAppended {
                chunk: "foo".into(),
            },
            false,
        ));
        assert_eq!(output["event"], "output");
        assert_eq!(output["chunk"], "foo");

        let error = to_json(&HeadlessEvent::from_engine_event(
            EngineEvent::Error {
                message: "Scan failed: timeout".into(),
            },
            false,
        ));
        assert_eq!(error["event"], "error");
        assert_eq!(error["message"], "Scan failed: timeout");
    }

    #[test]
    fn test_bridge_uses_status_label() {
        let status = BridgeStatus::Disconnected {
            reason: "refused".into(),
        };
        let expected = status.label();
        let json = to_json(&HeadlessEvent::from_engine_event(
            EngineEvent::BridgeStatusChanged { status },
            false,
        ));
        assert_eq!(json["event"], "bridge");
        assert_eq!(json["status"], expected);
    }

    #[test]
    fn test_ready_and_shutdown() {
        let ready = to_json(&HeadlessEvent::ready("ws://localhost:8080/eel", false));
        assert_eq!(ready["event"], "ready");
        assert_eq!(ready["host"], "ws://localhost:8080/eel");

        let shutdown = to_json(&HeadlessEvent::from_engine_event(EngineEvent::Shutdown, false));
        assert_eq!(shutdown, serde_json::json!({"event": "shutdown"}));
    }
}
