//! Status line: latest feedback message, scan activity and error count

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::state::StatusLevel;
use routerlab_app::AppState;

use crate::theme::{palette, styles};

pub struct StatusBar<'a> {
    state: &'a AppState,
    show_timestamps: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            show_timestamps: state.settings.ui.show_timestamps,
        }
    }

    fn message(&self) -> Vec<Span<'static>> {
        let Some(status) = &self.state.status else {
            return vec![Span::styled("Ready", styles::text_muted())];
        };
        let style = match status.level {
            StatusLevel::Info => Style::default().fg(palette::STATUS_BLUE),
            StatusLevel::Error => styles::status_red(),
        };
        let mut spans = Vec::with_capacity(2);
        if self.show_timestamps {
            spans.push(Span::styled(
                format!("{} ", status.at.format("%H:%M:%S")),
                styles::text_muted(),
            ));
        }
        spans.push(Span::styled(status.message.clone(), style));
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(self.message());

        if self.state.scans.has_queued() {
            spans.push(Span::styled("  (scan queued)", styles::text_muted()));
        }
        if self.state.error_count > 0 {
            spans.push(Span::styled(
                format!("  {} error(s)", self.state.error_count),
                styles::status_red(),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
