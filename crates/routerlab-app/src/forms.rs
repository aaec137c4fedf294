//! Router info and settings forms
//!
//! Plain editable state behind the Router Info and Settings tabs. The host
//! reads both through pull handlers; nothing here talks to the host itself.

use routerlab_core::RouterInfo;
use thiserror::Error;

/// Smallest scan interval the host accepts, in seconds.
pub const MIN_SCAN_INTERVAL_SECS: u32 = 10;

/// Scan interval used until the operator changes it, in seconds.
pub const DEFAULT_SCAN_INTERVAL_SECS: u32 = 30;

/// Longest value a text field accepts.
const MAX_FIELD_LEN: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Router info
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterField {
    #[default]
    ModelNumber,
    FirmwareVersion,
    HardwareVersion,
    SerialNumber,
}

impl RouterField {
    pub const ALL: [RouterField; 4] = [
        RouterField::ModelNumber,
        RouterField::FirmwareVersion,
        RouterField::HardwareVersion,
        RouterField::SerialNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RouterField::ModelNumber => "Model Number",
            RouterField::FirmwareVersion => "Firmware Version",
            RouterField::HardwareVersion => "Hardware Version",
            RouterField::SerialNumber => "Serial Number",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The router identity the operator is comparing against.
#[derive(Debug, Clone, Default)]
pub struct RouterInfoForm {
    info: RouterInfo,
    pub focused: RouterField,
    /// A `getDeviceInfo` call is in flight.
    pub fetching: bool,
}

impl RouterInfoForm {
    pub fn info(&self) -> &RouterInfo {
        &self.info
    }

    pub fn value(&self, field: RouterField) -> &str {
        match field {
            RouterField::ModelNumber => &self.info.model_number,
            RouterField::FirmwareVersion => &self.info.firmware_version,
            RouterField::HardwareVersion => &self.info.hardware_version,
            RouterField::SerialNumber => &self.info.serial_number,
        }
    }

    fn value_mut(&mut self, field: RouterField) -> &mut String {
        match field {
            RouterField::ModelNumber => &mut self.info.model_number,
            RouterField::FirmwareVersion => &mut self.info.firmware_version,
            RouterField::HardwareVersion => &mut self.info.hardware_version,
            RouterField::SerialNumber => &mut self.info.serial_number,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let field = self.focused;
        let value = self.value_mut(field);
        if !c.is_control() && value.chars().count() < MAX_FIELD_LEN {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused;
        self.value_mut(field).pop();
    }

    /// Take the identity reported by the host.
    pub fn merge(&mut self, info: RouterInfo) {
        self.info = info;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    ScanInterval,
    SendEmail,
    Email,
}

impl SettingsField {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::ScanInterval => "Scan Interval",
            SettingsField::SendEmail => "Send Email at Midnight",
            SettingsField::Email => "Email",
        }
    }
}

/// A settings value the host would reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("scan interval must be at least {MIN_SCAN_INTERVAL_SECS} seconds")]
    ScanIntervalTooShort,
    #[error("an email address is required to send email")]
    EmailMissing,
    #[error("'{0}' is not an email address")]
    EmailInvalid(String),
}

#[derive(Debug, Clone)]
pub struct SettingsForm {
    /// Digits as typed; see [`SettingsForm::scan_interval`].
    scan_interval: String,
    send_email: bool,
    email: String,
    pub focused: SettingsField,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS.to_string(),
            send_email: false,
            email: String::new(),
            focused: SettingsField::default(),
        }
    }
}

impl SettingsForm {
    /// Scan interval in seconds, never below the minimum.
    ///
    /// An empty field reads as the minimum.
    pub fn scan_interval(&self) -> u32 {
        self.scan_interval
            .parse::<u32>()
            .unwrap_or(MIN_SCAN_INTERVAL_SECS)
            .max(MIN_SCAN_INTERVAL_SECS)
    }

    pub fn scan_interval_text(&self) -> &str {
        &self.scan_interval
    }

    pub fn send_email(&self) -> bool {
        self.send_email
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn toggle_send_email(&mut self) {
        self.send_email = !self.send_email;
        if !self.send_email && self.focused == SettingsField::Email {
            self.focused = SettingsField::SendEmail;
        }
    }

    /// Fields currently shown, in focus order. Email only while sending.
    pub fn visible_fields(&self) -> Vec<SettingsField> {
        let mut fields = vec![SettingsField::ScanInterval, SettingsField::SendEmail];
        if self.send_email {
            fields.push(SettingsField::Email);
        }
        fields
    }

    pub fn focus_next(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + fields.len() - 1) % fields.len()];
    }

    /// Type into the focused field. Space toggles the checkbox.
    pub fn insert_char(&mut self, c: char) {
        match self.focused {
            SettingsField::ScanInterval => {
                if c.is_ascii_digit() && self.scan_interval.len() < 6 {
                    self.scan_interval.push(c);
                }
            }
            SettingsField::SendEmail => {
                if c == ' ' {
                    self.toggle_send_email();
                }
            }
            SettingsField::Email => {
                if self.send_email
                    && !c.is_control()
                    && !c.is_whitespace()
                    && self.email.chars().count() < MAX_FIELD_LEN
                {
                    self.email.push(c);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.focused {
            SettingsField::ScanInterval => {
                self.scan_interval.pop();
            }
            SettingsField::Email if self.send_email => {
                self.email.pop();
            }
            _ => {}
        }
    }

    /// First problem with the values as typed, if any.
    pub fn validate(&self) -> Result<(), FieldError> {
        let typed = self.scan_interval.parse::<u32>().unwrap_or(0);
        if typed < MIN_SCAN_INTERVAL_SECS {
            return Err(FieldError::ScanIntervalTooShort);
        }
        if self.send_email {
            if self.email.is_empty() {
                return Err(FieldError::EmailMissing);
            }
            let well_formed = self
                .email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            if !well_formed {
                return Err(FieldError::EmailInvalid(self.email.clone()));
            }
        }
        Ok(())
    }
}
