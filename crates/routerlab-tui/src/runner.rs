//! Main TUI runner - entry point and event loop

use routerlab_app::{Engine, EngineOptions};
use routerlab_core::prelude::*;

use crate::{event, render, terminal};

/// Run the TUI: connect to the host, then draw and handle keys until quit.
pub async fn run(options: EngineOptions) -> Result<()> {
    let mut engine = Engine::new(options).await?;
    info!(
        "Starting TUI against {} ({} panel handlers exposed)",
        engine.settings.bridge.host_url,
        engine.bridge().exposed().len()
    );

    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    ratatui::restore();

    result
}

/// Main event loop
fn run_loop(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        // Host replies, pushes, pulls and signals
        engine.drain_pending_messages();

        terminal
            .draw(|frame| render::view(frame, &engine.state))
            .map_err(|e| Error::terminal(format!("Failed to draw: {e}")))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}
