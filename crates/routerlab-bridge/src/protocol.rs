//! Wire protocol for the host call bridge.
//!
//! Both directions use the same two JSON text frames:
//!
//! ```text
//! call:   {"call": 7, "name": "get_scan_results", "args": []}
//! return: {"return": 7, "status": "ok", "value": {...}}
//! ```
//!
//! The panel and the host number their own calls independently; a `return`
//! always answers a `call` issued by the other side. A `return` without a
//! `status` field is treated as `"ok"`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use routerlab_core::prelude::*;

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A named procedure call, sent by either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFrame {
    /// Caller-assigned id echoed back in the matching [`ReturnFrame`].
    pub call: u64,
    /// Procedure (host side) or handler (panel side) name.
    pub name: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl CallFrame {
    pub fn new(call: u64, name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            call,
            name: name.into(),
            args,
        }
    }
}

/// Outcome reported in a [`ReturnFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    #[default]
    Ok,
    Error,
}

/// The single reply to a [`CallFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnFrame {
    #[serde(rename = "return")]
    pub id: u64,
    #[serde(default)]
    pub status: ReturnStatus,
    #[serde(default)]
    pub value: Value,
}

impl ReturnFrame {
    pub fn ok(id: u64, value: Value) -> Self {
        Self {
            id,
            status: ReturnStatus::Ok,
            value,
        }
    }

    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            status: ReturnStatus::Error,
            value: Value::String(message.into()),
        }
    }

    /// Build the reply for a handler outcome.
    pub fn from_result(id: u64, result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self::ok(id, value),
            Err(err) => Self::error(id, err.to_string()),
        }
    }

    /// Convert into the caller-facing result for `procedure`.
    pub fn into_result(self, procedure: &str) -> Result<Value> {
        match self.status {
            ReturnStatus::Ok => Ok(self.value),
            ReturnStatus::Error => {
                let message = match self.value {
                    Value::String(s) => s,
                    Value::Null => "host reported an error".to_string(),
                    other => other.to_string(),
                };
                Err(Error::host_call(procedure, message))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed message discriminant
// ---------------------------------------------------------------------------

/// The result of parsing a raw WebSocket text frame.
#[derive(Debug)]
pub enum BridgeMessage {
    /// A reply to a call we issued.
    Return(ReturnFrame),
    /// A call the other side wants us to run.
    Call(CallFrame),
    /// Anything we could not interpret.
    Unknown(String),
}

/// Parse a raw text frame into a typed [`BridgeMessage`].
///
/// A frame with a non-null `"return"` key is a reply; one with a `"call"`
/// key and a `"name"` is a call; everything else is [`BridgeMessage::Unknown`].
pub fn parse_bridge_message(text: &str) -> BridgeMessage {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return BridgeMessage::Unknown(text.to_string()),
    };

    let is_return = value.get("return").is_some_and(|v| !v.is_null());
    let is_call = value.get("call").is_some() && value.get("name").is_some();

    if is_return {
        match serde_json::from_value::<ReturnFrame>(value) {
            Ok(frame) => BridgeMessage::Return(frame),
            Err(_) => BridgeMessage::Unknown(text.to_string()),
        }
    } else if is_call {
        match serde_json::from_value::<CallFrame>(value) {
            Ok(frame) => BridgeMessage::Call(frame),
            Err(_) => BridgeMessage::Unknown(text.to_string()),
        }
    } else {
        BridgeMessage::Unknown(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Call tracker
// ---------------------------------------------------------------------------

/// A call waiting for its [`ReturnFrame`].
struct PendingCall {
    procedure: String,
    reply_tx: oneshot::Sender<Result<ReturnFrame>>,
    created_at: Instant,
}

/// Correlates outgoing call ids with the tasks awaiting their replies.
pub struct CallTracker {
    next_id: u64,
    pending: HashMap<u64, PendingCall>,
}

impl Default for CallTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTracker {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    /// Allocate a call id and register a pending slot for `procedure`.
    pub fn register(
        &mut self,
        procedure: &str,
    ) -> (u64, oneshot::Receiver<Result<ReturnFrame>>) {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let (tx, rx) = oneshot::channel();

        self.pending.insert(
            id,
            PendingCall {
                procedure: procedure.to_string(),
                reply_tx: tx,
                created_at: Instant::now(),
            },
        );

        (id, rx)
    }

    /// Deliver a reply to its waiting caller.
    ///
    /// Returns `false` when no call with that id is pending (late reply
    /// after a timeout, or a reply from a previous connection).
    pub fn complete(&mut self, frame: ReturnFrame) -> bool {
        if let Some(pending) = self.pending.remove(&frame.id) {
            let _ = pending.reply_tx.send(Ok(frame));
            true
        } else {
            false
        }
    }

    /// Fail a single call, e.g. when writing it to the socket failed.
    pub fn fail(&mut self, id: u64, err: Error) {
        if let Some(pending) = self.pending.remove(&id) {
            let _ = pending.reply_tx.send(Err(err));
        }
    }

    /// Fail every pending call with "host unavailable".
    ///
    /// Used when the connection drops: no reply can arrive any more.
    pub fn fail_all(&mut self, reason: &str) -> usize {
        let count = self.pending.len();
        for (_, pending) in self.pending.drain() {
            let _ = pending.reply_tx.send(Err(Error::bridge(reason.to_string())));
        }
        count
    }

    /// Time out calls pending longer than `timeout`.
    ///
    /// Returns `(id, procedure)` of each expired call.
    pub fn cleanup_stale(&mut self, timeout: Duration) -> Vec<(u64, String)> {
        let now = Instant::now();
        let stale: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, p)| now.duration_since(p.created_at) >= timeout)
            .map(|(id, _)| *id)
            .collect();

        let mut expired = Vec::with_capacity(stale.len());
        for id in stale {
            if let Some(pending) = self.pending.remove(&id) {
                let _ = pending
                    .reply_tx
                    .send(Err(Error::call_timeout(pending.procedure.clone())));
                expired.push((id, pending.procedure));
            }
        }
        expired
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
