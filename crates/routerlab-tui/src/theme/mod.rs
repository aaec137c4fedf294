//! Colors and styles shared by every widget.
//!
//! `palette` holds the raw colors; `styles` builds the semantic styles
//! (status indicators, focused borders, disabled buttons) from them.

pub mod palette;
pub mod styles;
