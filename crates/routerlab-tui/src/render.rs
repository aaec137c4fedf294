//! Main render/view function (View in TEA pattern)

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use routerlab_app::{AppState, Panel};

use crate::layout;
use crate::theme::palette;
use crate::widgets;

/// Render the complete UI
///
/// Pure rendering: reads state, never changes it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);

    frame.render_widget(
        widgets::MainHeader::new(&state.settings.bridge.host_url, &state.bridge),
        areas.header,
    );
    frame.render_widget(widgets::PanelTabs::new(state.panel), areas.tabs);

    match state.panel {
        Panel::Devices => frame.render_widget(
            widgets::DeviceTable::new(&state.registry, &state.scans, true),
            areas.body,
        ),
        Panel::Compare => frame.render_widget(
            widgets::ComparePanel::new(&state.compare, true).host_down(state.bridge.is_down()),
            areas.body,
        ),
        Panel::RouterInfo => frame.render_widget(
            widgets::RouterInfoPanel::new(&state.router_info, true),
            areas.body,
        ),
        Panel::Settings => frame.render_widget(
            widgets::SettingsPanel::new(&state.settings_form, true),
            areas.body,
        ),
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);
}
