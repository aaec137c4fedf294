//! Headless mode runner - main event loop without TUI
//!
//! Commands are read line by line from stdin and every engine event is
//! written to stdout as NDJSON.

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use routerlab_app::{Engine, EngineEvent, EngineOptions, Message};
use routerlab_core::prelude::*;

use super::HeadlessEvent;

/// Run in headless mode - output JSON events instead of TUI
pub async fn run_headless(options: EngineOptions) -> Result<()> {
    info!("routerlab starting in HEADLESS mode");

    let mut engine = Engine::new(options)
        .await
        .context("Failed to start headless engine")?;
    let mut events = engine.subscribe();
    let timestamps = engine.settings.ui.show_timestamps;

    HeadlessEvent::ready(&engine.settings.bridge.host_url, timestamps).emit();
    // Engine::new may already have marked the host down before we subscribed
    if engine.state.bridge.is_down() {
        HeadlessEvent::from_engine_event(
            EngineEvent::BridgeStatusChanged {
                status: engine.state.bridge.clone(),
            },
            timestamps,
        )
        .emit();
    }

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        read_stdin_commands(stdin_tx);
    });

    let result = headless_event_loop(&mut engine, &mut events, timestamps).await;

    engine.shutdown().await;
    flush_events(&mut events, timestamps);

    info!("routerlab headless mode exiting");
    result
}

async fn headless_event_loop(
    engine: &mut Engine,
    events: &mut broadcast::Receiver<EngineEvent>,
    timestamps: bool,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                flush_events(events, timestamps);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Write every event broadcast so far
fn flush_events(events: &mut broadcast::Receiver<EngineEvent>, timestamps: bool) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from_engine_event(event, timestamps).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output fell behind, {} event(s) dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Map one stdin line to a panel message
fn parse_command(line: &str) -> Option<Message> {
    match line {
        "s" | "scan" => Some(Message::RequestScan),
        "start" => Some(Message::StartCompare),
        "stop" => Some(Message::StopCompare),
        "save" => Some(Message::SaveLog),
        "i" | "info" | "router-info" => Some(Message::FetchRouterInfo),
        "q" | "quit" => Some(Message::Quit),
        _ => None,
    }
}

/// Blocking stdin reader, run on its own thread
fn read_stdin_commands(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_command(trimmed) {
            Some(msg) => {
                let quit = matches!(msg, Message::Quit);
                info!("Stdin: {}", trimmed);
                if msg_tx.blocking_send(msg).is_err() || quit {
                    break;
                }
            }
            None => warn!("Unknown stdin command: {}", trimmed),
        }
    }

    info!("Stdin reader exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command("s"), Some(Message::RequestScan)));
        assert!(matches!(parse_command("scan"), Some(Message::RequestScan)));
        assert!(matches!(parse_command("start"), Some(Message::StartCompare)));
        assert!(matches!(parse_command("stop"), Some(Message::StopCompare)));
        assert!(matches!(parse_command("save"), Some(Message::SaveLog)));
        assert!(matches!(parse_command("info"), Some(Message::FetchRouterInfo)));
        assert!(matches!(
            parse_command("router-info"),
            Some(Message::FetchRouterInfo)
        ));
        assert!(matches!(parse_command("q"), Some(Message::Quit)));
        assert!(parse_command("reload").is_none());
    }
}
