//! Custom widget components

mod compare;
mod devices;
mod header;
mod router_info;
mod settings;
mod status_bar;
mod tabs;

pub use compare::ComparePanel;
pub use devices::DeviceTable;
pub use header::MainHeader;
pub use router_info::RouterInfoPanel;
pub use settings::SettingsPanel;
pub use status_bar::StatusBar;
pub use tabs::PanelTabs;
