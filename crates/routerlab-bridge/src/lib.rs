//! # routerlab-bridge - Host Call Bridge
//!
//! Talks to the routerlab host process over a single WebSocket using
//! Eel-style JSON call/return frames. The panel calls host procedures and
//! exposes handlers the host calls back into.
//!
//! Depends on [`routerlab_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Connection
//! - [`BridgeClient`] - Owns the connection and its background I/O task
//! - [`BridgeHandle`] - Clonable handle: `call()` into the host, `expose()` handlers
//! - [`BridgeConfig`] - Endpoint, call timeout, reconnect policy
//! - [`BridgeEvent`], [`ConnectionState`] - Connection lifecycle
//!
//! ### Protocol
//! - [`CallFrame`], [`ReturnFrame`] - Wire frames
//! - [`CallTracker`] - Correlates call ids with waiting callers
//! - [`HandlerRegistry`] - Name → handler map for host-initiated calls
//!
//! ### Host procedures
//! - [`HostBridge`] - Trait seam over `call()`
//! - [`host`] - Typed procedures and exposed handler names
//! - [`ScanEntry`], [`parse_scan_reply()`] - Scan reply parsing

pub mod client;
pub mod handlers;
pub mod host;
pub mod protocol;
pub mod scan;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    validate_host_url, BridgeClient, BridgeConfig, BridgeEvent, BridgeHandle, ConnectionState,
    DEFAULT_CALL_TIMEOUT, DEFAULT_HOST_URL,
};
pub use handlers::{ExposedHandler, HandlerRegistry};
pub use host::{HostBridge, LocalHostBridge};
pub use protocol::{parse_bridge_message, BridgeMessage, CallFrame, CallTracker, ReturnFrame};
pub use scan::{parse_scan_reply, ScanEntry};
