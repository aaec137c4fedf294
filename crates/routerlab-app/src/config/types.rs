//! Configuration types for routerlab
//!
//! Defines `Settings` (the contents of `.routerlab/config.toml`) and its
//! sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use routerlab_bridge::{BridgeConfig, DEFAULT_HOST_URL};

use crate::scan::ScanPolicy;

/// Application settings (.routerlab/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub bridge: BridgeSettings,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Host connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BridgeSettings {
    /// WebSocket endpoint of the host process
    #[serde(default = "default_host_url")]
    pub host_url: String,

    /// How long a host call may take before it fails
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Reconnection attempts after the connection drops (0 = never)
    #[serde(default)]
    pub max_reconnect_attempts: u32,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            host_url: default_host_url(),
            call_timeout_ms: default_call_timeout_ms(),
            max_reconnect_attempts: 0,
        }
    }
}

impl BridgeSettings {
    pub fn to_bridge_config(&self) -> BridgeConfig {
        BridgeConfig::new(self.host_url.clone())
            .with_call_timeout(Duration::from_millis(self.call_timeout_ms.max(1)))
            .with_max_reconnect_attempts(self.max_reconnect_attempts)
    }
}

fn default_host_url() -> String {
    DEFAULT_HOST_URL.to_string()
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

/// Scan behaviour
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScanSettings {
    /// What happens to a scan requested while another is pending
    #[serde(default)]
    pub policy: ScanPolicy,

    /// Scan once as soon as the panel is up
    #[serde(default)]
    pub scan_on_start: bool,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Timestamp headless events
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_timestamps: true,
        }
    }
}

fn default_true() -> bool {
    true
}
