//! Panel tab strip

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::Panel;

use crate::theme::styles;

pub struct PanelTabs {
    focused: Panel,
}

impl PanelTabs {
    pub fn new(focused: Panel) -> Self {
        Self { focused }
    }
}

impl Widget for PanelTabs {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(Panel::ALL.len() * 2);
        for panel in Panel::ALL {
            let style = if panel == self.focused {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            spans.push(Span::styled(format!(" {} ", panel.title()), style));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
