//! Message types for the application (TEA pattern)

use serde_json::Value;
use tokio::sync::oneshot;

use routerlab_core::{DeviceRecord, DeviceStatus, RouterInfo};

use crate::compare::Transition;
use crate::input_key::InputKey;
use crate::scan::ScanId;
use crate::state::BridgeStatus;

/// Fire calls the compare controls make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareCall {
    Start,
    Stop,
    Save,
}

impl CompareCall {
    pub fn label(&self) -> &'static str {
        match self {
            CompareCall::Start => "start",
            CompareCall::Stop => "stop",
            CompareCall::Save => "save",
        }
    }
}

/// State the host can read through a pull handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequest {
    /// `get_output`
    Output,
    /// `get_router_info`
    RouterInfo,
    /// `get_scan_interval`
    ScanInterval,
}

/// All possible messages/actions in the application
///
/// Not `Clone`: [`Message::HostPull`] carries the channel its answer goes
/// back on.
#[derive(Debug)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Periodic tick
    Tick,

    /// Quit (q, Esc, Ctrl+C, signal, stdin)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Scan
    // ─────────────────────────────────────────────────────────
    /// Operator asked for a fresh scan
    RequestScan,

    /// Reply (or failure) for a scan sent to the host
    ScanFinished {
        scan_id: ScanId,
        result: Result<Vec<DeviceRecord>, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Compare
    // ─────────────────────────────────────────────────────────
    StartCompare,
    StopCompare,
    SaveLog,

    /// A compare fire call returned
    CompareCallFinished {
        call: CompareCall,
        /// Phase change applied when the call was sent, if any
        transition: Option<Transition>,
        result: Result<(), String>,
    },

    // ─────────────────────────────────────────────────────────
    // Router info
    // ─────────────────────────────────────────────────────────
    FetchRouterInfo,

    RouterInfoFetched(Result<RouterInfo, String>),

    // ─────────────────────────────────────────────────────────
    // Host-initiated calls
    // ─────────────────────────────────────────────────────────
    /// `update_output` push
    HostOutput(String),

    /// `update_status` push
    HostStatus { id: String, status: DeviceStatus },

    /// Pull handler waiting for a value
    HostPull {
        request: PullRequest,
        reply: oneshot::Sender<Value>,
    },

    /// Connection state changed
    BridgeStatusChanged(BridgeStatus),

    // ─────────────────────────────────────────────────────────
    // Navigation & forms
    // ─────────────────────────────────────────────────────────
    NextPanel,
    PrevPanel,
    FocusNextField,
    FocusPrevField,
    FormInput(char),
    FormBackspace,
}
