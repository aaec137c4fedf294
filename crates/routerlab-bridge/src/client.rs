//! Async WebSocket client for the host call bridge.
//!
//! The [`BridgeClient`] owns one WebSocket connection to the host process. It
//! sends named calls and routes replies back to the callers via oneshot
//! channels, and it runs the handlers the panel exposed whenever the host
//! calls into them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           BridgeClient                           │
//! │                                                                  │
//! │  ┌──────────────┐         ┌─────────────────────────────────┐   │
//! │  │ BridgeHandle │         │  I/O task                        │   │
//! │  │              │         │                                  │   │
//! │  │  call()  ────┼──cmd───▶│  WebSocket read/write loop       │   │
//! │  │              │  chan   │  return frame → CallTracker      │   │
//! │  │  expose() ─┐ │         │  call frame   → dispatcher ──┐   │   │
//! │  └────────────┼─┘         └──────────────────────────▲───┼───┘   │
//! │               │                               reply  │   │       │
//! │               ▼                                      │   ▼       │
//! │        HandlerRegistry ◀────── lookup ──────── Dispatcher task     │
//! │                                  (one host call at a time)        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Host calls are dispatched strictly one after another, so pushes take
//! effect in the order the host sent them. A call for a handler that has not
//! been exposed yet is answered with an error and otherwise dropped.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use routerlab_core::prelude::*;

use crate::handlers::HandlerRegistry;
use crate::protocol::{
    parse_bridge_message, BridgeMessage, CallFrame, CallTracker, ReturnFrame,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default host endpoint.
pub const DEFAULT_HOST_URL: &str = "ws://localhost:8080/eel";

/// Default time a call may wait for its reply.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Initial reconnection backoff duration.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum reconnection backoff duration (cap).
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Capacity of the command channel (bounded, to apply backpressure).
const CMD_CHANNEL_CAPACITY: usize = 32;

/// Capacity of the channel carrying handler replies back to the socket.
const REPLY_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the connection event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Upper bound on how often pending calls are checked for expiry.
const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How to reach the host process.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8080/eel`.
    pub url: String,
    /// How long a call may wait for its reply before failing.
    pub call_timeout: Duration,
    /// Reconnection attempts after the connection drops. `0` disables
    /// reconnection: once lost, every call fails.
    pub max_reconnect_attempts: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_HOST_URL.to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_reconnect_attempts: 0,
        }
    }
}

impl BridgeConfig {
    /// Check that `url` is a usable `ws://` or `wss://` endpoint.
    pub fn validate(&self) -> Result<()> {
        validate_host_url(&self.url).map(|_| ())
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

/// Current connection state of a [`BridgeClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Not connected; calls fail immediately.
    Disconnected,
    /// Initial connection attempt in progress.
    Connecting,
    /// Connected and ready to exchange calls.
    Connected,
    /// Connection lost; background task is retrying.
    Reconnecting {
        /// The current reconnection attempt number (1-indexed).
        attempt: u32,
    },
}

impl ConnectionState {
    pub fn label(&self) -> String {
        match self {
            ConnectionState::Disconnected => "disconnected".to_string(),
            ConnectionState::Connecting => "connecting".to_string(),
            ConnectionState::Connected => "connected".to_string(),
            ConnectionState::Reconnecting { attempt } => format!("reconnecting ({attempt})"),
        }
    }
}

/// Connection lifecycle notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The connection came back after a loss.
    Reconnected,
    /// The connection dropped; a reconnection attempt is scheduled.
    Reconnecting { attempt: u32, max_attempts: u32 },
    /// The connection is gone for good.
    Disconnected { reason: String },
}

// ---------------------------------------------------------------------------
// Internal command types
// ---------------------------------------------------------------------------

/// Messages from the public API to the I/O task.
enum ClientCommand {
    Call {
        procedure: String,
        args: Vec<Value>,
        reply_tx: oneshot::Sender<Result<ReturnFrame>>,
    },
    Disconnect,
}

/// A finished host call, tagged with the connection it arrived on.
struct HostReply {
    epoch: u64,
    frame: ReturnFrame,
}

/// A host call waiting for the dispatcher.
struct HostCall {
    epoch: u64,
    frame: CallFrame,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

// ---------------------------------------------------------------------------
// BridgeHandle
// ---------------------------------------------------------------------------

/// A clonable handle for calling the host and exposing handlers to it.
///
/// All clones share one connection and one handler registry. Once the I/O
/// task has exited, every call fails with a "host unavailable" error.
#[derive(Clone)]
pub struct BridgeHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    state: Arc<RwLock<ConnectionState>>,
    handlers: HandlerRegistry,
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("connection_state", &self.connection_state())
            .field("handlers", &self.handlers)
            .finish()
    }
}

impl BridgeHandle {
    /// Call `procedure` on the host and wait for its reply.
    ///
    /// # Errors
    ///
    /// - [`Error::Bridge`] / [`Error::ChannelClosed`] if the host is
    ///   unreachable or the connection dropped before the reply.
    /// - [`Error::CallTimeout`] if no reply came within the call timeout.
    /// - [`Error::HostCall`] if the host answered with an error status,
    ///   including an undefined procedure.
    pub async fn call(&self, procedure: &str, args: Vec<Value>) -> Result<Value> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.cmd_tx
            .send(ClientCommand::Call {
                procedure: procedure.to_string(),
                args,
                reply_tx,
            })
            .await
            .map_err(|_| Error::bridge("bridge connection is closed"))?;

        let frame = reply_rx
            .await
            .map_err(|_| Error::bridge("bridge connection is closed"))??;
        frame.into_result(procedure)
    }

    /// Register `handler` for host calls to `name`.
    ///
    /// Re-registering a name replaces the earlier handler. Host calls that
    /// arrive before the first registration are answered with an error.
    pub fn expose<F, Fut>(&self, name: &str, handler: F)
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        if self.handlers.insert(name, handler) {
            debug!("Bridge: replaced handler '{}'", name);
        } else {
            debug!("Bridge: exposed handler '{}'", name);
        }
    }

    /// Names of the handlers exposed so far.
    pub fn exposed(&self) -> Vec<String> {
        self.handlers.names()
    }

    /// Return the current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Return `true` if the client is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Ask the I/O task to close the connection.
    pub async fn disconnect(&self) {
        // The task may already be gone; nothing to do then.
        let _ = self.cmd_tx.send(ClientCommand::Disconnect).await;
    }

    /// A handle with no I/O task behind it: calls fail immediately.
    ///
    /// Used when the host could not be reached at start-up, so the panel can
    /// still come up and show the host as unavailable.
    pub fn offline() -> Self {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        Self {
            cmd_tx,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            handlers: HandlerRegistry::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BridgeClient
// ---------------------------------------------------------------------------

/// Owner of the host connection.
///
/// Create with [`BridgeClient::connect`], hand out [`BridgeHandle`]s with
/// [`BridgeClient::handle`], and drain [`BridgeEvent`]s from
/// [`BridgeClient::event_receiver`]. Dropping every handle and the client
/// closes the connection.
pub struct BridgeClient {
    handle: BridgeHandle,
    event_rx: mpsc::Receiver<BridgeEvent>,
}

impl BridgeClient {
    /// Connect to the host at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if the initial connection cannot be
    /// established.
    pub async fn connect(config: BridgeConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<BridgeEvent>(EVENT_CHANNEL_CAPACITY);
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));
        let handlers = HandlerRegistry::new();

        config.validate()?;
        info!("Connecting to host at {}", config.url);
        let ws_stream = connect_ws(&config.url).await?;
        set_state(&state, ConnectionState::Connected);

        tokio::spawn(run_client_task(
            config,
            ws_stream,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
            handlers.clone(),
        ));

        Ok(Self {
            handle: BridgeHandle {
                cmd_tx,
                state,
                handlers,
            },
            event_rx,
        })
    }

    /// A client that never connected. See [`BridgeHandle::offline`].
    pub fn offline() -> Self {
        let (_event_tx, event_rx) = mpsc::channel(1);
        Self {
            handle: BridgeHandle::offline(),
            event_rx,
        }
    }

    /// Create a clonable handle sharing this client's connection.
    pub fn handle(&self) -> BridgeHandle {
        self.handle.clone()
    }

    /// Connection lifecycle notifications.
    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<BridgeEvent> {
        &mut self.event_rx
    }

    /// Split into the handle and the event receiver.
    pub fn into_parts(self) -> (BridgeHandle, mpsc::Receiver<BridgeEvent>) {
        (self.handle, self.event_rx)
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Entry point for the background I/O task.
///
/// Starts the dispatcher, runs the I/O loop on the initial connection, then
/// reconnects with backoff if the policy allows it.
async fn run_client_task(
    config: BridgeConfig,
    ws_stream: WsStream,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<BridgeEvent>,
    state: Arc<RwLock<ConnectionState>>,
    handlers: HandlerRegistry,
) {
    // Unbounded: every host push must be delivered, in order
    let (host_call_tx, host_call_rx) = mpsc::unbounded_channel::<HostCall>();
    let (reply_tx, mut reply_rx) = mpsc::channel::<HostReply>(REPLY_CHANNEL_CAPACITY);
    let dispatcher = tokio::spawn(run_dispatcher(host_call_rx, reply_tx, handlers));

    let mut tracker = CallTracker::new();
    let mut epoch: u64 = 0;
    let mut io = IoContext {
        cmd_rx: &mut cmd_rx,
        reply_rx: &mut reply_rx,
        host_call_tx: &host_call_tx,
        tracker: &mut tracker,
        call_timeout: config.call_timeout,
    };

    let mut lost = run_io_loop(ws_stream, &mut io, epoch).await;
    let mut attempt: u32 = 1;

    while lost {
        let failed = io.tracker.fail_all("connection to host lost");
        if failed > 0 {
            warn!("Bridge: failed {} pending call(s) after connection loss", failed);
        }

        if attempt > config.max_reconnect_attempts {
            if config.max_reconnect_attempts > 0 {
                error!(
                    "Bridge: exceeded {} reconnection attempts, giving up",
                    config.max_reconnect_attempts
                );
            }
            let _ = event_tx.try_send(BridgeEvent::Disconnected {
                reason: "connection to host lost".to_string(),
            });
            break;
        }

        set_state(&state, ConnectionState::Reconnecting { attempt });
        let _ = event_tx.try_send(BridgeEvent::Reconnecting {
            attempt,
            max_attempts: config.max_reconnect_attempts,
        });

        let backoff = compute_backoff(attempt);
        warn!(
            "Bridge: connection lost, retrying in {:?} (attempt {}/{})",
            backoff, attempt, config.max_reconnect_attempts
        );
        tokio::time::sleep(backoff).await;

        // Every handle was dropped while we slept; nobody left to serve.
        if io.cmd_rx.is_closed() {
            break;
        }

        match connect_ws(&config.url).await {
            Ok(ws_stream) => {
                info!("Bridge: reconnected (attempt {})", attempt);
                set_state(&state, ConnectionState::Connected);
                let _ = event_tx.try_send(BridgeEvent::Reconnected);
                attempt = 1;
                epoch += 1;
                lost = run_io_loop(ws_stream, &mut io, epoch).await;
            }
            Err(err) => {
                warn!("Bridge: reconnection attempt {} failed: {}", attempt, err);
                attempt += 1;
            }
        }
    }

    io.tracker.fail_all("bridge shut down");
    set_state(&state, ConnectionState::Disconnected);
    dispatcher.abort();
    debug!("Bridge background task exiting");
}

/// Borrowed state shared by consecutive I/O loops.
struct IoContext<'a> {
    cmd_rx: &'a mut mpsc::Receiver<ClientCommand>,
    reply_rx: &'a mut mpsc::Receiver<HostReply>,
    host_call_tx: &'a mpsc::UnboundedSender<HostCall>,
    tracker: &'a mut CallTracker,
    call_timeout: Duration,
}

/// Run one connection's read/write select loop.
///
/// Returns `true` if the connection was lost unexpectedly, `false` on a
/// requested shutdown (Disconnect command, or every handle dropped).
async fn run_io_loop(ws_stream: WsStream, io: &mut IoContext<'_>, epoch: u64) -> bool {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let IoContext {
        cmd_rx,
        reply_rx,
        host_call_tx,
        tracker,
        call_timeout,
    } = io;
    let call_timeout = *call_timeout;

    let mut cleanup_interval = tokio::time::interval(cleanup_interval_for(call_timeout));
    cleanup_interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            // ── Incoming WebSocket frame ─────────────────────────────────
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_ws_text(text.as_str(), tracker, host_call_tx, epoch);
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Bridge: received Close frame");
                        return true;
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary: ignore
                    }
                    Some(Err(err)) => {
                        warn!("Bridge: WebSocket read error: {}", err);
                        return true;
                    }
                    None => {
                        debug!("Bridge: WebSocket stream ended");
                        return true;
                    }
                }
            }

            // ── Outgoing command from a handle ───────────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Call { procedure, args, reply_tx }) => {
                        if !send_call(&procedure, args, reply_tx, tracker, &mut ws_sink).await {
                            return true;
                        }
                    }
                    Some(ClientCommand::Disconnect) => {
                        send_close(&mut ws_sink).await;
                        return false;
                    }
                    None => {
                        debug!("Bridge: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        return false;
                    }
                }
            }

            // ── Finished host call from the dispatcher ───────────────────
            Some(reply) = reply_rx.recv() => {
                if reply.epoch != epoch {
                    debug!("Bridge: dropping reply {} from a previous connection", reply.frame.id);
                    continue;
                }
                if let Err(err) = send_frame(&mut ws_sink, &reply.frame).await {
                    warn!("Bridge: failed to send reply {}: {}", reply.frame.id, err);
                    return true;
                }
            }

            // ── Periodic expiry of unanswered calls ──────────────────────
            _ = cleanup_interval.tick() => {
                let expired = tracker.cleanup_stale(call_timeout);
                for (id, procedure) in expired {
                    warn!("Bridge: call {} to '{}' timed out", id, procedure);
                }
            }
        }
    }
}

/// Dispatcher task: runs host calls one at a time, in arrival order.
async fn run_dispatcher(
    mut host_call_rx: mpsc::UnboundedReceiver<HostCall>,
    reply_tx: mpsc::Sender<HostReply>,
    handlers: HandlerRegistry,
) {
    while let Some(HostCall { epoch, frame }) = host_call_rx.recv().await {
        let result = handlers.dispatch(&frame.name, frame.args).await;
        if let Err(ref err) = result {
            debug!("Bridge: host call '{}' failed: {}", frame.name, err);
        }
        let reply = HostReply {
            epoch,
            frame: ReturnFrame::from_result(frame.call, result),
        };
        if reply_tx.send(reply).await.is_err() {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Parse `raw` as a host endpoint, accepting only `ws` and `wss` schemes.
pub fn validate_host_url(raw: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| Error::config_invalid(format!("host url '{raw}': {e}")))?;
    match parsed.scheme() {
        "ws" | "wss" => Ok(parsed),
        other => Err(Error::config_invalid(format!(
            "host url '{raw}' has scheme '{other}', expected ws or wss"
        ))),
    }
}

/// Establish a new WebSocket connection to `url`.
async fn connect_ws(url: &str) -> Result<WsStream> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|err| Error::connect(url, err.to_string()))?;
    Ok(ws_stream)
}

/// Compute exponential backoff duration for reconnection attempt `n`.
///
/// The formula is `INITIAL_BACKOFF * 2^(n-1)`, capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}

/// Check for expired calls often enough to honour short timeouts.
fn cleanup_interval_for(call_timeout: Duration) -> Duration {
    (call_timeout / 2).clamp(Duration::from_millis(10), MAX_CLEANUP_INTERVAL)
}

/// Route an incoming text frame to the tracker or the dispatcher.
fn handle_ws_text(
    text: &str,
    tracker: &mut CallTracker,
    host_call_tx: &mpsc::UnboundedSender<HostCall>,
    epoch: u64,
) {
    match parse_bridge_message(text) {
        BridgeMessage::Return(frame) => {
            let id = frame.id;
            if !tracker.complete(frame) {
                debug!("Bridge: reply for unknown call id {}", id);
            }
        }
        BridgeMessage::Call(frame) => {
            if host_call_tx.send(HostCall { epoch, frame }).is_err() {
                warn!("Bridge: dispatcher has stopped, dropping host call");
            }
        }
        BridgeMessage::Unknown(raw) => {
            let preview: String = raw.chars().take(120).collect();
            debug!("Bridge: ignoring unknown frame: {}", preview);
        }
    }
}

/// Register a call in the tracker and write it to the socket.
///
/// Returns `false` if the socket write failed (connection is gone).
async fn send_call(
    procedure: &str,
    args: Vec<Value>,
    reply_tx: oneshot::Sender<Result<ReturnFrame>>,
    tracker: &mut CallTracker,
    ws_sink: &mut WsSink,
) -> bool {
    // Register before touching the wire so the slot exists if the reply
    // races the send.
    let (id, reply_rx) = tracker.register(procedure);
    let frame = CallFrame::new(id, procedure, args);

    // Forward the tracker's verdict to the caller.
    tokio::spawn(async move {
        let result = reply_rx
            .await
            .unwrap_or_else(|_| Err(Error::bridge("call dropped before a reply arrived")));
        let _ = reply_tx.send(result);
    });

    match send_frame(ws_sink, &frame).await {
        Ok(()) => {
            debug!("Bridge: sent call {} '{}'", id, procedure);
            true
        }
        Err(err) => {
            warn!("Bridge: failed to send call '{}': {}", procedure, err);
            tracker.fail(id, Error::bridge(format!("failed to send call: {err}")));
            false
        }
    }
}

/// Serialize `frame` and write it as a text message.
async fn send_frame<T: serde::Serialize>(ws_sink: &mut WsSink, frame: &T) -> Result<()> {
    let json = serde_json::to_string(frame)?;
    ws_sink
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|err| Error::bridge(err.to_string()))
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut WsSink) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

fn set_state(state: &RwLock<ConnectionState>, new_state: ConnectionState) {
    let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
    *guard = new_state;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_at_local_host() {
        let config = BridgeConfig::default();
        assert_eq!(config.url, DEFAULT_HOST_URL);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
        assert_eq!(config.max_reconnect_attempts, 0);
    }

    #[test]
    fn test_config_builders() {
        let config = BridgeConfig::new("ws://10.0.0.2:9000/eel")
            .with_call_timeout(Duration::from_millis(250))
            .with_max_reconnect_attempts(3);
        assert_eq!(config.url, "ws://10.0.0.2:9000/eel");
        assert_eq!(config.call_timeout, Duration::from_millis(250));
        assert_eq!(config.max_reconnect_attempts, 3);
    }

    #[test]
    fn test_validate_host_url_accepts_websocket_schemes() {
        assert!(validate_host_url("ws://localhost:8080/eel").is_ok());
        assert!(validate_host_url("wss://router.lan/eel").is_ok());
    }

    #[test]
    fn test_validate_host_url_rejects_other_schemes() {
        assert!(validate_host_url("http://localhost:8080/eel").is_err());
        assert!(validate_host_url("localhost:8080").is_err());
        assert!(validate_host_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url_before_dialing() {
        let result = BridgeClient::connect(BridgeConfig::new("http://localhost/eel")).await;
        assert!(matches!(result, Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_reconnection_backoff_doubles() {
        assert_eq!(compute_backoff(1), Duration::from_secs(1));
        assert_eq!(compute_backoff(2), Duration::from_secs(2));
        assert_eq!(compute_backoff(3), Duration::from_secs(4));
        assert_eq!(compute_backoff(5), Duration::from_secs(16));
    }

    #[test]
    fn test_reconnection_backoff_capped_at_max() {
        assert_eq!(compute_backoff(6), MAX_BACKOFF);
        assert_eq!(compute_backoff(200), MAX_BACKOFF);
    }

    #[test]
    fn test_cleanup_interval_tracks_short_timeouts() {
        assert_eq!(
            cleanup_interval_for(Duration::from_millis(200)),
            Duration::from_millis(100)
        );
        assert_eq!(cleanup_interval_for(Duration::from_secs(60)), MAX_CLEANUP_INTERVAL);
        assert_eq!(
            cleanup_interval_for(Duration::ZERO),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_connection_state_labels() {
        assert_eq!(ConnectionState::Connected.label(), "connected");
        assert_eq!(
            ConnectionState::Reconnecting { attempt: 2 }.label(),
            "reconnecting (2)"
        );
    }

    #[tokio::test]
    async fn test_offline_handle_rejects_calls() {
        let handle = BridgeHandle::offline();
        assert!(!handle.is_connected());

        let err = handle.call("get_scan_results", vec![]).await.unwrap_err();
        assert!(err.is_host_unavailable());
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_host_fails() {
        // Port 9 (discard) on localhost is not a WebSocket server.
        let result = BridgeClient::connect(BridgeConfig::new("ws://127.0.0.1:9/eel")).await;
        assert!(matches!(result, Err(Error::Connect { .. })));
    }

    #[test]
    fn test_expose_is_visible_through_clones() {
        let handle = BridgeHandle::offline();
        let clone = handle.clone();
        clone.expose("get_output", |_args: Vec<Value>| async { Ok(Value::from("")) });
        assert_eq!(handle.exposed(), vec!["get_output".to_string()]);
    }

    #[test]
    fn test_handle_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone + std::fmt::Debug>() {}
        assert_traits::<BridgeHandle>();
    }
}
