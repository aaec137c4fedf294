//! routerlab - terminal control panel for a router discovery and comparison host
//!
//! The panel is split across the workspace crates:
//!
//! - `routerlab-core`: domain types, errors, logging
//! - `routerlab-bridge`: the WebSocket bridge to the host process
//! - `routerlab-app`: panel state (TEA) and the Engine
//! - `routerlab-tui`: ratatui frontend
//!
//! This crate adds the headless (NDJSON) frontend and the binary.

pub mod headless;

use routerlab_app::EngineOptions;
use routerlab_core::prelude::*;

pub use headless::runner::run_headless;

/// Run the TUI frontend
pub async fn run_tui(options: EngineOptions) -> Result<()> {
    let result = routerlab_tui::run(options).await;

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("routerlab exiting");
    result
}
