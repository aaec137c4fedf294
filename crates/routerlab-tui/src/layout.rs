//! Screen layout definitions for the TUI
//!
//! ```text
//! ┌ header ─────────────────────────────────────┐
//! ├ panel tabs ─────────────────────────────────┤
//! │ focused panel                               │
//! │                                             │
//! ├ status line ────────────────────────────────┤
//! └─────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Header: top border, title row, bottom border
const HEADER_HEIGHT: u16 = 3;
/// Panel tab strip
const TABS_HEIGHT: u16 = 1;
/// Status line
const STATUS_HEIGHT: u16 = 1;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,
    pub tabs: Rect,
    pub body: Rect,
    pub status: Rect,
}

/// Create the main screen layout
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(TABS_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        tabs: chunks[1],
        body: chunks[2],
        status: chunks[3],
    }
}

/// Split the compare panel into the controls row and the transcript
pub fn compare_split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);
    (chunks[0], chunks[1])
}
