//! Message processing: runs the TEA update loop and dispatches actions

use tokio::sync::mpsc;

use routerlab_bridge::HostBridge;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Follow-up messages are processed immediately, in the same call; actions
/// are handed to [`handle_action`] and report back through `msg_tx`.
pub fn process_message<B>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    bridge: &B,
) where
    B: HostBridge + Clone + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), bridge);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
