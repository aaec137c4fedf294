//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`, so subscribers see a consistent view of state
//! changes. The headless runner turns them into NDJSON lines.

use routerlab_core::{ComparePhase, DeviceRecord};

use crate::state::BridgeStatus;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Devices
    // ─────────────────────────────────────────────────────────
    /// Registry contents changed (scan applied, cleared, or status push)
    DevicesChanged { devices: Vec<DeviceRecord> },

    // ─────────────────────────────────────────────────────────
    // Compare
    // ─────────────────────────────────────────────────────────
    /// Compare session moved between idle, running and stopped
    PhaseChanged {
        old_phase: ComparePhase,
        new_phase: ComparePhase,
        can_save: bool,
    },

    /// New transcript text from `update_output`
    OutputAppended { chunk: String },

    // ─────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────
    /// An error was reported on the status line
    Error { message: String },

    /// Host connection state changed
    BridgeStatusChanged { status: BridgeStatus },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DevicesChanged { .. } => "devices_changed",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::OutputAppended { .. } => "output_appended",
            Self::Error { .. } => "error",
            Self::BridgeStatusChanged { .. } => "bridge_status_changed",
            Self::Shutdown => "shutdown",
        }
    }
}
