//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use routerlab_app::BridgeStatus;
use routerlab_core::{ComparePhase, DeviceStatus};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - focused field or enabled button under the cursor
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// A control that would be refused right now
pub fn disabled() -> Style {
    Style::default()
        .fg(palette::TEXT_MUTED)
        .add_modifier(Modifier::CROSSED_OUT)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
        .style(Style::default().bg(palette::CARD_BG))
}

// --- Indicators ---

/// (icon, label, style) for a device's liveness
pub fn device_status_indicator(status: DeviceStatus) -> (&'static str, &'static str, Style) {
    match status {
        DeviceStatus::Up => ("●", "up", Style::default().fg(palette::STATUS_GREEN)),
        DeviceStatus::Down => ("○", "down", Style::default().fg(palette::STATUS_RED)),
    }
}

/// (icon, label, style) for the compare phase
pub fn compare_phase_indicator(phase: ComparePhase) -> (&'static str, &'static str, Style) {
    match phase {
        ComparePhase::Idle => ("○", "Idle", text_muted()),
        ComparePhase::Running => (
            "●",
            "Running",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        ComparePhase::Stopped => ("■", "Stopped", Style::default().fg(palette::STATUS_YELLOW)),
    }
}

/// (icon, style) for the host connection
pub fn bridge_indicator(status: &BridgeStatus) -> (&'static str, Style) {
    match status {
        BridgeStatus::Connected => ("●", Style::default().fg(palette::STATUS_GREEN)),
        BridgeStatus::Reconnecting { .. } => ("↻", Style::default().fg(palette::STATUS_YELLOW)),
        BridgeStatus::Disconnected { .. } => ("✗", Style::default().fg(palette::STATUS_RED)),
    }
}
