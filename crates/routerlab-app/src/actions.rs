//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every host call runs on its own task and reports back through the
//! message channel, so a slow host never blocks the update loop.

use tokio::sync::mpsc;
use tracing::warn;

use routerlab_bridge::host;
use routerlab_bridge::HostBridge;

use crate::compare::Transition;
use crate::handler::UpdateAction;
use crate::message::{CompareCall, Message};
use crate::scan::ScanId;

/// Execute an action by spawning a background task
pub fn handle_action<B>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, bridge: &B)
where
    B: HostBridge + Clone + Send + Sync + 'static,
{
    match action {
        UpdateAction::ScanDevices { scan_id } => {
            spawn_scan(scan_id, msg_tx, bridge.clone());
        }

        UpdateAction::FireCompare { call, transition } => {
            spawn_compare_call(call, transition, msg_tx, bridge.clone());
        }

        UpdateAction::FetchRouterInfo => {
            spawn_router_info(msg_tx, bridge.clone());
        }
    }
}

fn spawn_scan<B>(scan_id: ScanId, msg_tx: mpsc::Sender<Message>, bridge: B)
where
    B: HostBridge + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match host::get_scan_results(&bridge).await {
            Ok(entries) => Ok(entries.into_iter().map(|e| e.into_record()).collect()),
            Err(e) => {
                warn!("get_scan_results failed: {}", e);
                Err(e.to_string())
            }
        };
        let _ = msg_tx.send(Message::ScanFinished { scan_id, result }).await;
    });
}

fn spawn_compare_call<B>(
    call: CompareCall,
    transition: Option<Transition>,
    msg_tx: mpsc::Sender<Message>,
    bridge: B,
) where
    B: HostBridge + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let outcome = match call {
            CompareCall::Start => host::start_compare(&bridge).await,
            CompareCall::Stop => host::stop_compare(&bridge).await,
            CompareCall::Save => host::save_log(&bridge).await,
        };
        let result = outcome.map_err(|e| {
            warn!("{} call failed: {}", call.label(), e);
            e.to_string()
        });
        let _ = msg_tx
            .send(Message::CompareCallFinished {
                call,
                transition,
                result,
            })
            .await;
    });
}

fn spawn_router_info<B>(msg_tx: mpsc::Sender<Message>, bridge: B)
where
    B: HostBridge + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = host::get_device_info(&bridge)
            .await
            .map_err(|e| e.to_string());
        let _ = msg_tx.send(Message::RouterInfoFetched(result)).await;
    });
}
