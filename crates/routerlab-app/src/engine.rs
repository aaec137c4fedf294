//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the panel state, the message channel, the host bridge
//! handle and the event broadcaster. Both runners drive it the same way:
//! receive a [`Message`], hand it to [`Engine::process_message`], repeat
//! until [`Engine::should_quit`].

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use routerlab_bridge::{BridgeClient, BridgeEvent, BridgeHandle};
use routerlab_core::prelude::*;
use routerlab_core::ComparePhase;

use crate::config::{self, Settings};
use crate::engine_event::EngineEvent;
use crate::host_handlers::expose_panel_handlers;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::{AppState, BridgeStatus};

/// Capacity of the unified message channel.
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the engine event broadcaster.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How the Engine should find its settings and host.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Directory holding `.routerlab/config.toml`
    pub project_path: PathBuf,
    /// Explicit config file; replaces the project/user lookup
    pub config_path: Option<PathBuf>,
    /// `--host` flag; wins over the config file and `ROUTERLAB_HOST`
    pub host_override: Option<String>,
}

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq)]
struct StateSnapshot {
    registry_revision: u64,
    compare_phase: ComparePhase,
    can_save: bool,
    log_generation: u64,
    log_chunks: usize,
    error_count: u64,
    bridge: BridgeStatus,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            registry_revision: state.registry.revision(),
            compare_phase: state.compare.phase(),
            can_save: state.compare.can_save(),
            log_generation: state.compare.log().generation(),
            log_chunks: state.compare.log().chunks().len(),
            error_count: state.error_count,
            bridge: state.bridge.clone(),
        }
    }
}

/// Orchestration engine for the control panel.
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin, host handlers).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Loaded settings (after CLI and environment overrides)
    pub settings: Settings,

    /// Directory the settings were looked up in
    pub project_path: PathBuf,

    bridge: BridgeHandle,

    /// Forwards connection lifecycle events into the message channel.
    bridge_events: Option<JoinHandle<()>>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Create an Engine and connect to the host.
    ///
    /// - Initializes `.routerlab/` (non-fatal if it fails)
    /// - Loads settings and applies the host override
    /// - Connects to the host; an unreachable host leaves the panel up
    ///   with the host shown as unavailable
    /// - Exposes the panel handlers and spawns the signal handler
    ///
    /// Fails only on an invalid host URL.
    pub async fn new(options: EngineOptions) -> Result<Self> {
        let EngineOptions {
            project_path,
            config_path,
            host_override,
        } = options;

        if let Err(e) = config::init_config_dir(&project_path) {
            warn!("Failed to initialize .routerlab directory: {}", e);
        }

        let mut settings = match &config_path {
            Some(path) => config::load_settings_file(path),
            None => config::load_settings(&project_path),
        };
        config::apply_host_override(&mut settings, host_override.as_deref())?;

        let bridge_config = settings.bridge.to_bridge_config();
        let (client, connect_error) = match BridgeClient::connect(bridge_config).await {
            Ok(client) => (client, None),
            Err(e) if e.is_host_unavailable() => {
                warn!("Host at {} unavailable: {}", settings.bridge.host_url, e);
                (BridgeClient::offline(), Some(e.to_string()))
            }
            Err(e) => return Err(e),
        };

        let mut engine = Self::with_bridge(settings, project_path, client);
        signals::spawn_signal_handler(engine.msg_sender());

        if let Some(reason) = connect_error {
            engine.process_message(Message::BridgeStatusChanged(BridgeStatus::Disconnected {
                reason,
            }));
        } else if engine.settings.scan.scan_on_start {
            engine.process_message(Message::RequestScan);
        }

        Ok(engine)
    }

    /// Create an Engine around an already-built bridge client.
    ///
    /// Exposes the panel handlers on the client before returning, so the
    /// host may call them as soon as this returns.
    pub fn with_bridge(settings: Settings, project_path: PathBuf, client: BridgeClient) -> Self {
        let (bridge, event_rx) = client.into_parts();

        let mut state = AppState::with_settings(settings.clone());
        if !bridge.is_connected() {
            state.bridge = BridgeStatus::Disconnected {
                reason: "not connected".to_string(),
            };
        }

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        expose_panel_handlers(&bridge, msg_tx.clone());
        let bridge_events = Some(spawn_bridge_event_forwarder(event_rx, msg_tx.clone()));

        info!(
            "Engine ready: host {} ({}), scan policy {}",
            settings.bridge.host_url,
            bridge.connection_state().label(),
            settings.scan.policy
        );

        Self {
            state,
            msg_tx,
            msg_rx,
            settings,
            project_path,
            bridge,
            bridge_events,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Emits EngineEvents based on state changes detected by comparing
    /// before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(&mut self.state, msg, &self.msg_tx, &self.bridge);

        let post = StateSnapshot::capture(&self.state);
        if pre != post {
            self.emit_events(&pre, &post);
        }
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. Used by the TUI runner
    /// which needs to drain all pending messages before rendering.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Handle used for calls into the host.
    pub fn bridge(&self) -> &BridgeHandle {
        &self.bridge
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Announce shutdown and close the host connection.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        if let Some(task) = self.bridge_events.take() {
            task.abort();
        }
        self.bridge.disconnect().await;
        info!("Engine shut down");
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.registry_revision != post.registry_revision {
            let devices = self.state.registry.sorted().into_iter().cloned().collect();
            self.emit(EngineEvent::DevicesChanged { devices });
        }

        if pre.compare_phase != post.compare_phase || pre.can_save != post.can_save {
            self.emit(EngineEvent::PhaseChanged {
                old_phase: pre.compare_phase,
                new_phase: post.compare_phase,
                can_save: post.can_save,
            });
        }

        // A cleared transcript starts counting from zero again
        let first_new = if pre.log_generation == post.log_generation {
            pre.log_chunks
        } else {
            0
        };
        for chunk in self.state.compare.log().chunks().iter().skip(first_new) {
            self.emit(EngineEvent::OutputAppended {
                chunk: chunk.clone(),
            });
        }

        if post.error_count > pre.error_count {
            if let Some(message) = self.state.last_error() {
                self.emit(EngineEvent::Error {
                    message: message.to_string(),
                });
            }
        }

        if pre.bridge != post.bridge {
            self.emit(EngineEvent::BridgeStatusChanged {
                status: post.bridge.clone(),
            });
        }
    }

    fn emit(&self, event: EngineEvent) {
        trace!("EngineEvent: {}", event.event_type());
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

/// Turn connection lifecycle events into [`Message::BridgeStatusChanged`].
fn spawn_bridge_event_forwarder(
    mut event_rx: mpsc::Receiver<BridgeEvent>,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let status = match event {
                BridgeEvent::Reconnected => BridgeStatus::Connected,
                BridgeEvent::Reconnecting {
                    attempt,
                    max_attempts,
                } => BridgeStatus::Reconnecting {
                    attempt,
                    max_attempts,
                },
                BridgeEvent::Disconnected { reason } => BridgeStatus::Disconnected { reason },
            };
            if msg_tx
                .send(Message::BridgeStatusChanged(status))
                .await
                .is_err()
            {
                break;
            }
        }
        debug!("Bridge event stream ended");
    })
}
