//! Terminal-independent key input.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary,
//! so the panel state never depends on a terminal library and the headless
//! runner can drive the same update function.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+C, ...)
    CharCtrl(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    /// Function key F1-F12
    F(u8),
}

impl InputKey {
    pub fn is_force_quit(&self) -> bool {
        matches!(self, InputKey::CharCtrl('c'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_is_force_quit() {
        assert!(InputKey::CharCtrl('c').is_force_quit());
        assert!(!InputKey::Char('c').is_force_quit());
        assert!(!InputKey::CharCtrl('x').is_force_quit());
    }
}
