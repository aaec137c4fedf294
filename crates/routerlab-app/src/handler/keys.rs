//! Key event handlers for the panels

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Convert key events to messages based on the focused panel
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if key.is_force_quit() {
        return Some(Message::Quit);
    }

    if let Some(msg) = handle_key_global(key) {
        return Some(msg);
    }

    if state.panel.is_form() {
        handle_key_form(key)
    } else {
        handle_key_controls(key)
    }
}

/// Keys that mean the same thing on every panel
fn handle_key_global(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::Quit),
        InputKey::Tab => Some(Message::NextPanel),
        InputKey::BackTab => Some(Message::PrevPanel),
        InputKey::Enter | InputKey::F(5) => Some(Message::StartCompare),
        _ => None,
    }
}

/// Devices and Compare panels: single-letter shortcuts
fn handle_key_controls(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),
        InputKey::Char('s') => Some(Message::RequestScan),
        InputKey::Char('x') => Some(Message::StopCompare),
        InputKey::Char('w') => Some(Message::SaveLog),
        InputKey::Char('i') => Some(Message::FetchRouterInfo),
        InputKey::Left => Some(Message::PrevPanel),
        InputKey::Right => Some(Message::NextPanel),
        _ => None,
    }
}

/// Router Info and Settings panels: keys edit the focused field
fn handle_key_form(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up => Some(Message::FocusPrevField),
        InputKey::Down => Some(Message::FocusNextField),
        InputKey::Backspace => Some(Message::FormBackspace),
        InputKey::Char(c) => Some(Message::FormInput(c)),
        _ => None,
    }
}
