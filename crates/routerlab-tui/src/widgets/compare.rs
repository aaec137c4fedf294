//! Compare controls and transcript
//!
//! The controls row mirrors [`CompareSession::controls`]: a button that
//! would be refused is drawn crossed out.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::CompareSession;

use crate::layout;
use crate::theme::{palette, styles};

pub struct ComparePanel<'a> {
    session: &'a CompareSession,
    focused: bool,
    /// Start/Stop are refused while the host is down
    host_down: bool,
}

impl<'a> ComparePanel<'a> {
    pub fn new(session: &'a CompareSession, focused: bool) -> Self {
        Self {
            session,
            focused,
            host_down: false,
        }
    }

    pub fn host_down(mut self, host_down: bool) -> Self {
        self.host_down = host_down;
        self
    }

    fn button(label: &'static str, key: &'static str, enabled: bool) -> Vec<Span<'static>> {
        let style = if enabled {
            styles::accent()
        } else {
            styles::disabled()
        };
        vec![
            Span::styled(format!("[{label}]"), style),
            Span::styled(format!(" {key}   "), styles::text_muted()),
        ]
    }

    fn render_controls(&self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(" Compare ");
        let inner = block.inner(area);
        block.render(area, buf);

        let controls = self.session.controls();
        let (icon, label, phase_style) = styles::compare_phase_indicator(self.session.phase());

        let mut spans = vec![Span::styled(format!("{icon} {label}   "), phase_style)];
        spans.extend(Self::button("Start", "Enter", controls.start && !self.host_down));
        spans.extend(Self::button("Stop", "x", controls.stop && !self.host_down));
        spans.extend(Self::button("Save", "w", controls.save));

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }

    fn render_transcript(&self, area: Rect, buf: &mut Buffer) {
        let log = self.session.log();
        let title = format!(" Output ({} chunks) ", log.len());
        let block = styles::glass_block(false).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if log.is_empty() {
            Paragraph::new(Span::styled("No output yet.", styles::text_muted()))
                .render(inner, buf);
            return;
        }

        let text_style = Style::default().fg(palette::TRANSCRIPT_TEXT);
        let lines: Vec<Line> = log
            .tail_lines(inner.height as usize)
            .into_iter()
            .map(|line| Line::from(Span::styled(line.to_string(), text_style)))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

impl Widget for ComparePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (controls, transcript) = layout::compare_split(area);
        self.render_controls(controls, buf);
        self.render_transcript(transcript, buf);
    }
}
