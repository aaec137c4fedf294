//! Settings form
//!
//! The email field only appears while "send email" is ticked. The first
//! validation problem is shown under the fields.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use routerlab_app::forms::{SettingsField, SettingsForm};

use crate::theme::styles;

pub struct SettingsPanel<'a> {
    form: &'a SettingsForm,
    focused: bool,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(form: &'a SettingsForm, focused: bool) -> Self {
        Self { form, focused }
    }

    fn value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::ScanInterval => format!("{} s", self.form.scan_interval_text()),
            SettingsField::SendEmail => {
                if self.form.send_email() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            SettingsField::Email => self.form.email().to_string(),
        }
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(" Settings ");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = self
            .form
            .visible_fields()
            .into_iter()
            .map(|field| {
                let value_style = if self.focused && field == self.form.focused {
                    styles::focused_selected()
                } else {
                    styles::text_primary()
                };
                Line::from(vec![
                    Span::styled(format!("{:<24}", field.label()), styles::text_secondary()),
                    Span::styled(format!(" {} ", self.value(field)), value_style),
                ])
            })
            .collect();

        lines.push(Line::default());
        match self.form.validate() {
            Ok(()) => lines.push(Line::from(Span::styled(
                format!("Host reads a scan interval of {} s", self.form.scan_interval()),
                styles::text_muted(),
            ))),
            Err(e) => lines.push(Line::from(Span::styled(e.to_string(), styles::status_red()))),
        }
        lines.push(Line::from(Span::styled(
            "[Up/Down] field  [Space] toggle",
            styles::keybinding(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
