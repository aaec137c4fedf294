//! Application state (Model in TEA pattern)

use chrono::{DateTime, Local};

use routerlab_core::AppPhase;

use crate::compare::CompareSession;
use crate::config::Settings;
use crate::forms::{RouterInfoForm, SettingsForm};
use crate::registry::DeviceRegistry;
use crate::scan::ScanController;

/// Panel with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Devices,
    Compare,
    RouterInfo,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Devices,
        Panel::Compare,
        Panel::RouterInfo,
        Panel::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Devices => "Devices",
            Panel::Compare => "Compare",
            Panel::RouterInfo => "Router Info",
            Panel::Settings => "Settings",
        }
    }

    /// Panels where printable keys edit a field instead of triggering
    /// shortcuts.
    pub fn is_form(&self) -> bool {
        matches!(self, Panel::RouterInfo | Panel::Settings)
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Host connection as last reported by the bridge
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BridgeStatus {
    #[default]
    Connected,
    Reconnecting {
        attempt: u32,
        max_attempts: u32,
    },
    Disconnected {
        reason: String,
    },
}

impl BridgeStatus {
    /// Calls are known to fail right now.
    pub fn is_down(&self) -> bool {
        !matches!(self, BridgeStatus::Connected)
    }

    pub fn label(&self) -> String {
        match self {
            BridgeStatus::Connected => "host connected".to_string(),
            BridgeStatus::Reconnecting {
                attempt,
                max_attempts,
            } => format!("reconnecting {attempt}/{max_attempts}"),
            BridgeStatus::Disconnected { .. } => "host unavailable".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line feedback shown under the panels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub level: StatusLevel,
    pub at: DateTime<Local>,
}

/// Complete panel state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub panel: Panel,
    pub registry: DeviceRegistry,
    pub scans: ScanController,
    pub compare: CompareSession,
    pub router_info: RouterInfoForm,
    pub settings_form: SettingsForm,
    pub bridge: BridgeStatus,
    pub status: Option<StatusLine>,
    /// Bumped whenever an error is reported, for event emission.
    pub error_count: u64,
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: AppPhase::default(),
            panel: Panel::default(),
            registry: DeviceRegistry::new(),
            scans: ScanController::new(settings.scan.policy),
            compare: CompareSession::new(),
            router_info: RouterInfoForm::default(),
            settings_form: SettingsForm::default(),
            bridge: BridgeStatus::default(),
            status: None,
            error_count: 0,
            settings,
        }
    }

    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn report_info(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            level: StatusLevel::Info,
            at: Local::now(),
        });
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            level: StatusLevel::Error,
            at: Local::now(),
        });
        self.error_count += 1;
    }

    /// Message of the latest error, if the status line shows one.
    pub fn last_error(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| s.level == StatusLevel::Error)
            .map(|s| s.message.as_str())
    }
}
