//! Test utilities for the call bridge
//!
//! [`MockHost`] is a real WebSocket server on `127.0.0.1` that speaks the
//! bridge protocol. Tests script how it answers each procedure, inspect the
//! calls it received, and call back into the panel's exposed handlers the
//! way the real host does.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use routerlab_core::prelude::*;

use crate::protocol::{parse_bridge_message, BridgeMessage, CallFrame, ReturnFrame};

/// How long [`MockHost`] helpers wait before giving up.
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// How the mock answers a procedure call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `status: ok` with this value.
    Ok(Value),
    /// `status: error` with this message.
    Error(String),
    /// Send the inner reply after a delay.
    Delayed(Duration, Box<MockReply>),
    /// Never answer.
    Silent,
}

impl MockReply {
    pub fn ok(value: Value) -> Self {
        MockReply::Ok(value)
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockReply::Error(message.into())
    }

    pub fn delayed(delay: Duration, reply: MockReply) -> Self {
        MockReply::Delayed(delay, Box::new(reply))
    }
}

/// A call the mock received from the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub name: String,
    pub args: Vec<Value>,
}

enum HostOp {
    Send(String),
    Close,
}

#[derive(Default)]
struct MockState {
    /// Persistent reply per procedure.
    scripts: HashMap<String, MockReply>,
    /// One-shot replies, consumed before `scripts`.
    queued: HashMap<String, VecDeque<MockReply>>,
    calls: Vec<RecordedCall>,
    /// Outgoing queue of the live connection, tagged with its serial number.
    connection: Option<(usize, mpsc::UnboundedSender<HostOp>)>,
    connections_accepted: usize,
    next_call_id: u64,
    pending: HashMap<u64, oneshot::Sender<ReturnFrame>>,
}

impl MockState {
    fn reply_for(&mut self, name: &str) -> MockReply {
        if let Some(reply) = self.queued.get_mut(name).and_then(VecDeque::pop_front) {
            return reply;
        }
        self.scripts
            .get(name)
            .cloned()
            .unwrap_or_else(|| MockReply::Error(format!("undefined procedure '{name}'")))
    }
}

/// An in-process stand-in for the host.
///
/// Procedures without a script are answered with an error, like a host that
/// never registered them.
pub struct MockHost {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
    accept_task: JoinHandle<()>,
}

impl MockHost {
    /// Bind to an ephemeral port and start accepting panel connections.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock host listener");
        let addr = listener.local_addr().expect("mock host local addr");
        let state = Arc::new(Mutex::new(MockState::default()));
        let accept_task = tokio::spawn(accept_loop(listener, Arc::clone(&state)));
        Self {
            addr,
            state,
            accept_task,
        }
    }

    /// Endpoint to hand to the bridge client.
    pub fn url(&self) -> String {
        format!("ws://{}/eel", self.addr)
    }

    /// Always answer `procedure` with `reply`.
    pub fn on(&self, procedure: &str, reply: MockReply) {
        self.lock().scripts.insert(procedure.to_string(), reply);
    }

    /// Answer the next call to `procedure` with `reply`, then fall back to
    /// the persistent script.
    pub fn once(&self, procedure: &str, reply: MockReply) {
        self.lock()
            .queued
            .entry(procedure.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Names of every call received so far, in arrival order.
    pub fn call_names(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.name.clone()).collect()
    }

    pub fn call_count(&self, procedure: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.name == procedure)
            .count()
    }

    /// Wait until `procedure` has been called at least `count` times.
    pub async fn wait_for_calls(&self, procedure: &str, count: usize) {
        let waited = tokio::time::timeout(WAIT_TIMEOUT, async {
            while self.call_count(procedure) < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "timed out waiting for {count} call(s) to '{procedure}', saw {:?}",
            self.call_names()
        );
    }

    /// Wait until a panel is connected.
    pub async fn wait_for_connection(&self) {
        let waited = tokio::time::timeout(WAIT_TIMEOUT, async {
            while self.lock().connection.is_none() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "timed out waiting for a panel connection");
    }

    pub fn connections_accepted(&self) -> usize {
        self.lock().connections_accepted
    }

    /// Call a handler the panel exposed and wait for its reply.
    pub async fn call_panel(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let (id, conn) = {
            let mut state = self.lock();
            state.next_call_id += 1;
            let id = state.next_call_id;
            state.pending.insert(id, reply_tx);
            (id, state.connection.as_ref().map(|(_, tx)| tx.clone()))
        };

        let conn = conn.ok_or_else(|| Error::bridge("no panel connected"))?;
        let text = serde_json::to_string(&CallFrame::new(id, name, args))?;
        conn.send(HostOp::Send(text))
            .map_err(|_| Error::bridge("panel connection closed"))?;

        let frame = tokio::time::timeout(WAIT_TIMEOUT, reply_rx)
            .await
            .map_err(|_| Error::call_timeout(name))?
            .map_err(|_| Error::bridge("panel connection closed"))?;
        frame.into_result(name)
    }

    /// Call a handler without waiting for the reply.
    ///
    /// Pushes sent back to back reach the panel in the order sent.
    pub fn push(&self, name: &str, args: Vec<Value>) -> Result<()> {
        let (id, conn) = {
            let mut state = self.lock();
            state.next_call_id += 1;
            (
                state.next_call_id,
                state.connection.as_ref().map(|(_, tx)| tx.clone()),
            )
        };
        let conn = conn.ok_or_else(|| Error::bridge("no panel connected"))?;
        let text = serde_json::to_string(&CallFrame::new(id, name, args))?;
        conn.send(HostOp::Send(text))
            .map_err(|_| Error::bridge("panel connection closed"))
    }

    /// Close the live connection from the host side.
    pub fn drop_connection(&self) {
        if let Some((_, conn)) = self.lock().connection.take() {
            let _ = conn.send(HostOp::Close);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for MockHost {
    fn drop(&mut self) {
        self.drop_connection();
        self.accept_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, state: Arc<Mutex<MockState>>) {
    while let Ok((stream, _peer)) = listener.accept().await {
        let ws = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(err) => {
                debug!("MockHost: handshake failed: {}", err);
                continue;
            }
        };

        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let serial = {
            let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
            guard.connections_accepted += 1;
            let serial = guard.connections_accepted;
            guard.connection = Some((serial, op_tx.clone()));
            serial
        };
        tokio::spawn(serve_connection(ws, serial, op_tx, op_rx, Arc::clone(&state)));
    }
}

async fn serve_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    serial: usize,
    op_tx: mpsc::UnboundedSender<HostOp>,
    mut op_rx: mpsc::UnboundedReceiver<HostOp>,
    state: Arc<Mutex<MockState>>,
) {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text.to_string(),
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                match parse_bridge_message(&text) {
                    BridgeMessage::Call(call) => answer_call(call, &op_tx, &state),
                    BridgeMessage::Return(frame) => {
                        let waiter = state
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .pending
                            .remove(&frame.id);
                        if let Some(waiter) = waiter {
                            let _ = waiter.send(frame);
                        }
                    }
                    BridgeMessage::Unknown(raw) => {
                        debug!("MockHost: ignoring frame {}", raw);
                    }
                }
            }
            op = op_rx.recv() => {
                match op {
                    Some(HostOp::Send(text)) => {
                        if sink.send(WsMessage::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(HostOp::Close) | None => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        let _ = sink.close().await;
                        break;
                    }
                }
            }
        }
    }

    let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
    if matches!(guard.connection, Some((live, _)) if live == serial) {
        guard.connection = None;
    }
}

fn answer_call(
    call: CallFrame,
    op_tx: &mpsc::UnboundedSender<HostOp>,
    state: &Arc<Mutex<MockState>>,
) {
    let reply = {
        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
        guard.calls.push(RecordedCall {
            name: call.name.clone(),
            args: call.args.clone(),
        });
        guard.reply_for(&call.name)
    };
    schedule_reply(call.call, reply, op_tx.clone());
}

fn schedule_reply(id: u64, reply: MockReply, op_tx: mpsc::UnboundedSender<HostOp>) {
    let frame = match reply {
        MockReply::Ok(value) => ReturnFrame::ok(id, value),
        MockReply::Error(message) => ReturnFrame::error(id, message),
        MockReply::Silent => return,
        MockReply::Delayed(delay, inner) => {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                schedule_reply(id, *inner, op_tx);
            });
            return;
        }
    };
    if let Ok(text) = serde_json::to_string(&frame) {
        let _ = op_tx.send(HostOp::Send(text));
    }
}
