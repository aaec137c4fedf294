//! Router identity form

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::forms::{RouterField, RouterInfoForm};

use crate::theme::styles;

pub struct RouterInfoPanel<'a> {
    form: &'a RouterInfoForm,
    focused: bool,
}

impl<'a> RouterInfoPanel<'a> {
    pub fn new(form: &'a RouterInfoForm, focused: bool) -> Self {
        Self { form, focused }
    }
}

impl Widget for RouterInfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.form.fetching {
            " Router Info (fetching...) "
        } else {
            " Router Info "
        };
        let block = styles::glass_block(self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = RouterField::ALL
            .iter()
            .map(|field| {
                let value_style = if self.focused && *field == self.form.focused {
                    styles::focused_selected()
                } else {
                    styles::text_primary()
                };
                Line::from(vec![
                    Span::styled(format!("{:<18}", field.label()), styles::text_secondary()),
                    Span::styled(format!(" {} ", self.form.value(*field)), value_style),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "[Up/Down] field  [Enter] start compare",
            styles::keybinding(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
