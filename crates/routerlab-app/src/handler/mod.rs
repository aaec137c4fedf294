//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers per panel

pub(crate) mod keys;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use crate::compare::Transition;
use crate::message::{CompareCall, Message};
use crate::scan::ScanId;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Send `get_scan_results` to the host
    ScanDevices { scan_id: ScanId },

    /// Send a compare fire call. `transition` is the optimistic phase
    /// change to undo if the host rejects the call.
    FireCompare {
        call: CompareCall,
        transition: Option<Transition>,
    },

    /// Send `getDeviceInfo` to the host
    FetchRouterInfo,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
