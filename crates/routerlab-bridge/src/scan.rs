//! Parsing of `get_scan_results` replies
//!
//! The host answers a scan with an object keyed by device id:
//!
//! ```json
//! {
//!   "192.168.1.10": { "addresses": { "mac": "AA:BB:CC:DD:EE:01" } },
//!   "192.168.1.2":  { "addresses": {}, "self": true }
//! }
//! ```
//!
//! Parsing is all-or-nothing: one bad entry rejects the whole reply.

use serde_json::{Map, Value};

use routerlab_core::prelude::*;
use routerlab_core::{DeviceRecord, SELF_DEVICE_ID};

use crate::host::json_kind;

/// One device as reported by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Id the host keyed the entry by.
    pub id: String,
    /// Hardware address, if the host resolved a non-empty one.
    pub address: Option<String>,
    /// The host flagged this entry as its own machine.
    pub is_self: bool,
}

impl ScanEntry {
    /// Convert into a registry record.
    ///
    /// The host's own machine is stored under [`SELF_DEVICE_ID`] without an
    /// address, whatever the host keyed it by. Status pushes for it must use
    /// that id too.
    pub fn into_record(self) -> DeviceRecord {
        if self.maps_to_self() {
            DeviceRecord::discovered(SELF_DEVICE_ID, None)
        } else {
            DeviceRecord::discovered(self.id, self.address)
        }
    }

    fn maps_to_self(&self) -> bool {
        self.is_self || self.id == SELF_DEVICE_ID
    }
}

/// Parse a full scan reply.
///
/// # Errors
///
/// [`Error::MalformedReply`] if the reply is not an object, any entry is
/// not an object carrying an `addresses` object, or more than one entry maps
/// to [`SELF_DEVICE_ID`] (flagged `self`, or keyed `SELF`).
pub fn parse_scan_reply(reply: &Value) -> Result<Vec<ScanEntry>> {
    let Value::Object(entries) = reply else {
        return Err(Error::malformed_reply(format!(
            "scan reply is {}, expected an object",
            json_kind(reply)
        )));
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for (id, raw) in entries {
        parsed.push(parse_entry(id, raw)?);
    }

    let own: Vec<&str> = parsed
        .iter()
        .filter(|e| e.maps_to_self())
        .map(|e| e.id.as_str())
        .collect();
    if own.len() > 1 {
        return Err(Error::malformed_reply(format!(
            "scan reply names {} entries as the host's own machine: {}",
            own.len(),
            own.join(", ")
        )));
    }
    Ok(parsed)
}

fn parse_entry(id: &str, raw: &Value) -> Result<ScanEntry> {
    let Value::Object(fields) = raw else {
        return Err(Error::malformed_reply(format!(
            "scan entry '{id}' is {}, expected an object",
            json_kind(raw)
        )));
    };

    let addresses = match fields.get("addresses") {
        Some(Value::Object(addresses)) => addresses,
        Some(other) => {
            return Err(Error::malformed_reply(format!(
                "scan entry '{id}' has addresses of {}, expected an object",
                json_kind(other)
            )))
        }
        None => {
            return Err(Error::malformed_reply(format!(
                "scan entry '{id}' has no addresses"
            )))
        }
    };

    Ok(ScanEntry {
        id: id.to_string(),
        address: mac_address(addresses),
        is_self: fields.get("self").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// A present, non-empty string `mac`. Anything else counts as unresolved.
fn mac_address(addresses: &Map<String, Value>) -> Option<String> {
    addresses
        .get("mac")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|mac| !mac.is_empty())
        .map(str::to_string)
}
