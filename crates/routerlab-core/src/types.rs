//! Core domain types

use serde::{Deserialize, Serialize};

/// Reserved registry id for the host machine's own device.
pub const SELF_DEVICE_ID: &str = "SELF";

// ─────────────────────────────────────────────────────────────────────────────
// Devices
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness of a discovered device, as last reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Up,
    Down,
}

impl DeviceStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, DeviceStatus::Up)
    }

    /// Parse the wire spelling used by `update_status` pushes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Some(DeviceStatus::Up),
            "down" => Some(DeviceStatus::Down),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Up => write!(f, "up"),
            DeviceStatus::Down => write!(f, "down"),
        }
    }
}

/// A device discovered by a scan
///
/// `address` is `None` for the host machine itself and for devices whose
/// hardware address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: DeviceStatus,
}

impl DeviceRecord {
    /// A freshly scanned device. Scans only ever report live devices.
    pub fn discovered(id: impl Into<String>, address: Option<String>) -> Self {
        Self {
            id: id.into(),
            address,
            status: DeviceStatus::Up,
        }
    }

    pub fn is_self(&self) -> bool {
        self.id == SELF_DEVICE_ID
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compare session
// ─────────────────────────────────────────────────────────────────────────────

/// Phase of the compare control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparePhase {
    /// No compare has been started since the panel came up
    #[default]
    Idle,
    /// Host is comparing; output is streaming in
    Running,
    /// Host was told to stop; the transcript can be saved
    Stopped,
}

impl ComparePhase {
    pub fn label(&self) -> &'static str {
        match self {
            ComparePhase::Idle => "idle",
            ComparePhase::Running => "running",
            ComparePhase::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ComparePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Router identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identity fields of the router under test
///
/// Serialized with the camelCase names the host reads when it writes the
/// header of a saved transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterInfo {
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub firmware_version: String,
    #[serde(default)]
    pub hardware_version: String,
    #[serde(default)]
    pub serial_number: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Panel lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle phase of the panel itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_status_parse() {
        assert_eq!(DeviceStatus::parse("up"), Some(DeviceStatus::Up));
        assert_eq!(DeviceStatus::parse(" DOWN "), Some(DeviceStatus::Down));
        assert_eq!(DeviceStatus::parse("sideways"), None);
    }

    #[test]
    fn test_device_status_serde_lowercase() {
        let json = serde_json::to_string(&DeviceStatus::Down).unwrap();
        assert_eq!(json, "\"down\"");
    }

    #[test]
    fn test_discovered_device_is_up() {
        let record = DeviceRecord::discovered("h1", Some("AA:BB".into()));
        assert_eq!(record.status, DeviceStatus::Up);
        assert_eq!(record.address.as_deref(), Some("AA:BB"));
        assert!(!record.is_self());
        assert!(DeviceRecord::discovered(SELF_DEVICE_ID, None).is_self());
    }

    #[test]
    fn test_compare_phase_default_is_idle() {
        assert_eq!(ComparePhase::default(), ComparePhase::Idle);
        assert_eq!(ComparePhase::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_router_info_camel_case_wire_names() {
        let info = RouterInfo {
            model_number: "EA8300".into(),
            firmware_version: "1.1.4".into(),
            hardware_version: "1".into(),
            serial_number: "19A10".into(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["modelNumber"], "EA8300");
        assert_eq!(value["firmwareVersion"], "1.1.4");
        assert_eq!(value["hardwareVersion"], "1");
        assert_eq!(value["serialNumber"], "19A10");
    }

    #[test]
    fn test_router_info_missing_fields_default_empty() {
        let info: RouterInfo = serde_json::from_str(r#"{"modelNumber":"X"}"#).unwrap();
        assert_eq!(info.model_number, "X");
        assert!(info.serial_number.is_empty());
    }
}
