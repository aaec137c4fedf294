//! Typed host procedures
//!
//! Every call the panel makes into the host goes through one of the
//! functions here. Replies are parsed at this boundary into enumerated
//! structs; the rest of the panel never sees raw JSON.

use serde_json::Value;

use routerlab_core::prelude::*;
use routerlab_core::RouterInfo;

use crate::client::BridgeHandle;
use crate::scan::{parse_scan_reply, ScanEntry};

/// Procedures the host implements.
pub mod procedures {
    pub const GET_SCAN_RESULTS: &str = "get_scan_results";
    pub const START_COMPARE: &str = "start_compare";
    pub const STOP_COMPARE: &str = "stop_compare";
    pub const SAVE_LOG: &str = "save_log";
    pub const GET_DEVICE_INFO: &str = "getDeviceInfo";
}

/// Handlers the panel exposes to the host.
pub mod exposed {
    /// Push: append a chunk of compare output.
    pub const UPDATE_OUTPUT: &str = "update_output";
    /// Push: a device went up or down.
    pub const UPDATE_STATUS: &str = "update_status";
    /// Pull: the full compare transcript.
    pub const GET_OUTPUT: &str = "get_output";
    /// Pull: router identity fields.
    pub const GET_ROUTER_INFO: &str = "get_router_info";
    /// Pull: configured scan interval in seconds.
    pub const GET_SCAN_INTERVAL: &str = "get_scan_interval";

    pub const ALL: [&str; 5] = [
        UPDATE_OUTPUT,
        UPDATE_STATUS,
        GET_OUTPUT,
        GET_ROUTER_INFO,
        GET_SCAN_INTERVAL,
    ];
}

/// Something that can call named procedures on the host
///
/// [`BridgeHandle`] is the production implementation; tests substitute
/// recording fakes.
#[trait_variant::make(HostBridge: Send)]
pub trait LocalHostBridge {
    /// Call `procedure` and wait for the reply value.
    async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Value>;
}

impl HostBridge for BridgeHandle {
    async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Value> {
        BridgeHandle::call(self, procedure, args).await
    }
}

/// Ask the host for a fresh scan and parse its reply.
///
/// # Errors
///
/// Any bridge failure, or [`Error::MalformedReply`] if the reply does not
/// have the expected shape.
pub async fn get_scan_results<B: HostBridge + ?Sized>(bridge: &B) -> Result<Vec<ScanEntry>> {
    let reply = bridge.call(procedures::GET_SCAN_RESULTS, Vec::new()).await?;
    parse_scan_reply(&reply)
}

/// Tell the host to begin comparing. The reply value is ignored.
pub async fn start_compare<B: HostBridge + ?Sized>(bridge: &B) -> Result<()> {
    bridge.call(procedures::START_COMPARE, Vec::new()).await?;
    Ok(())
}

/// Tell the host to stop comparing. The reply value is ignored.
pub async fn stop_compare<B: HostBridge + ?Sized>(bridge: &B) -> Result<()> {
    bridge.call(procedures::STOP_COMPARE, Vec::new()).await?;
    Ok(())
}

/// Tell the host to persist the transcript.
///
/// The host pulls the text itself through `get_output`, so no arguments are
/// sent.
pub async fn save_log<B: HostBridge + ?Sized>(bridge: &B) -> Result<()> {
    bridge.call(procedures::SAVE_LOG, Vec::new()).await?;
    Ok(())
}

/// Read the router's identity from the host.
///
/// Only the four known fields are taken from the reply; anything else is
/// ignored and missing fields come back empty.
pub async fn get_device_info<B: HostBridge + ?Sized>(bridge: &B) -> Result<RouterInfo> {
    let reply = bridge.call(procedures::GET_DEVICE_INFO, Vec::new()).await?;
    if !reply.is_object() {
        return Err(Error::malformed_reply(format!(
            "{} returned {}, expected an object",
            procedures::GET_DEVICE_INFO,
            json_kind(&reply)
        )));
    }
    serde_json::from_value(reply).map_err(|e| Error::malformed_reply(e.to_string()))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
