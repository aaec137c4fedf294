//! Handlers the host process calls into.
//!
//! Push handlers (`update_output`, `update_status`) forward their payload to
//! the update loop and return at once. Pull handlers (`get_output`,
//! `get_router_info`, `get_scan_interval`) hand the loop a oneshot sender
//! and wait for it to answer from current state, so a pull always sees every
//! push delivered before it.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use routerlab_bridge::host::exposed;
use routerlab_bridge::BridgeHandle;
use routerlab_core::prelude::*;
use routerlab_core::DeviceStatus;

use crate::message::{Message, PullRequest};

/// Register every panel handler on `bridge`.
///
/// Call once, before the host is told the panel is ready; calls that arrive
/// for a name not yet exposed are answered with an error.
pub fn expose_panel_handlers(bridge: &BridgeHandle, msg_tx: mpsc::Sender<Message>) {
    let tx = msg_tx.clone();
    bridge.expose(exposed::UPDATE_OUTPUT, move |args| {
        let tx = tx.clone();
        async move {
            let chunk = parse_output_args(&args)?;
            push(&tx, Message::HostOutput(chunk)).await
        }
    });

    let tx = msg_tx.clone();
    bridge.expose(exposed::UPDATE_STATUS, move |args| {
        let tx = tx.clone();
        async move {
            let (id, status) = parse_status_args(&args)?;
            push(&tx, Message::HostStatus { id, status }).await
        }
    });

    for (name, request) in [
        (exposed::GET_OUTPUT, PullRequest::Output),
        (exposed::GET_ROUTER_INFO, PullRequest::RouterInfo),
        (exposed::GET_SCAN_INTERVAL, PullRequest::ScanInterval),
    ] {
        let tx = msg_tx.clone();
        bridge.expose(name, move |_args| {
            let tx = tx.clone();
            async move { pull(&tx, request).await }
        });
    }

    debug!("Exposed panel handlers: {:?}", bridge.exposed());
}

async fn push(msg_tx: &mpsc::Sender<Message>, msg: Message) -> Result<Value> {
    msg_tx
        .send(msg)
        .await
        .map_err(|_| Error::channel_send("panel is shutting down"))?;
    Ok(Value::Null)
}

pub(crate) async fn pull(msg_tx: &mpsc::Sender<Message>, request: PullRequest) -> Result<Value> {
    let (reply, rx) = oneshot::channel();
    msg_tx
        .send(Message::HostPull { request, reply })
        .await
        .map_err(|_| Error::channel_send("panel is shutting down"))?;
    rx.await.map_err(|_| Error::ChannelClosed)
}

/// `update_output(chunk)`. Non-string chunks are appended as their JSON text.
pub(crate) fn parse_output_args(args: &[Value]) -> Result<String> {
    match args.first() {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(Error::protocol(
            "update_output expects one argument: the output chunk",
        )),
        Some(other) => Ok(other.to_string()),
    }
}

/// `update_status(id, status)` with status `"up"` or `"down"`.
pub(crate) fn parse_status_args(args: &[Value]) -> Result<(String, DeviceStatus)> {
    let id = match args.first() {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(Error::protocol(
                "update_status expects a device id as its first argument",
            ))
        }
    };
    let status = args
        .get(1)
        .and_then(Value::as_str)
        .and_then(DeviceStatus::parse)
        .ok_or_else(|| {
            Error::protocol(format!(
                "update_status for '{id}' expects status \"up\" or \"down\""
            ))
        })?;
    Ok((id, status))
}
