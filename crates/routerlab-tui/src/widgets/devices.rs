//! Device registry table

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Widget},
};

use routerlab_app::{DeviceRegistry, ScanController};

use crate::theme::styles;

pub struct DeviceTable<'a> {
    registry: &'a DeviceRegistry,
    scans: &'a ScanController,
    focused: bool,
}

impl<'a> DeviceTable<'a> {
    pub fn new(registry: &'a DeviceRegistry, scans: &'a ScanController, focused: bool) -> Self {
        Self {
            registry,
            scans,
            focused,
        }
    }

    fn title(&self) -> String {
        let mut title = format!(
            " Devices ({} found, {} up) ",
            self.registry.len(),
            self.registry.up_count()
        );
        if self.scans.is_scanning() {
            title.push_str("scanning... ");
        }
        title
    }
}

impl Widget for DeviceTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.registry.is_empty() {
            let hint = if self.scans.is_scanning() {
                "Waiting for scan results..."
            } else {
                "No devices. Press [s] to scan."
            };
            Paragraph::new(Line::from(Span::styled(hint, styles::text_muted())))
                .render(inner, buf);
            return;
        }

        let header = Row::new(vec!["Device", "MAC Address", "Status"])
            .style(styles::text_secondary().add_modifier(Modifier::BOLD));

        let rows = self.registry.sorted().into_iter().map(|record| {
            let address = if record.is_self() {
                Span::styled("this machine", styles::text_muted())
            } else {
                match &record.address {
                    Some(mac) => Span::styled(mac.clone(), styles::text_primary()),
                    None => Span::styled("unknown", styles::text_muted()),
                }
            };
            let (icon, label, style) = styles::device_status_indicator(record.status);
            Row::new(vec![
                Cell::from(Span::styled(record.id.clone(), styles::text_primary())),
                Cell::from(address),
                Cell::from(Span::styled(format!("{icon} {label}"), style)),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .render(inner, buf);
    }
}
