//! Header bar widget
//!
//! App title, host URL with its connection dot, and the global keys.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::BridgeStatus;

use crate::theme::styles;

pub struct MainHeader<'a> {
    host_url: &'a str,
    bridge: &'a BridgeStatus,
}

impl<'a> MainHeader<'a> {
    pub fn new(host_url: &'a str, bridge: &'a BridgeStatus) -> Self {
        Self { host_url, bridge }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (icon, icon_style) = styles::bridge_indicator(self.bridge);
        let mut spans = vec![
            Span::styled(" routerlab ", styles::accent_bold()),
            Span::styled(format!("{icon} "), icon_style),
            Span::styled(self.host_url.to_string(), styles::text_secondary()),
            Span::styled(format!(" ({})", self.bridge.label()), styles::text_muted()),
        ];

        // Shortcuts only when there is room after the host
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let hints = "  [Tab] panel  [Enter] start  [Esc] quit";
        if used + hints.chars().count() <= inner.width as usize {
            spans.push(Span::styled(hints, styles::keybinding()));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
