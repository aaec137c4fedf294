//! routerlab-app - Session state and orchestration for the routerlab panel
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the panel
//! state: the device registry, the scan controller, the compare session and
//! its transcript, the router-info and settings forms, plus the Engine that
//! wires them to the host bridge. Configuration loading lives here too.

pub mod actions;
pub mod compare;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod forms;
pub mod handler;
pub mod host_handlers;
pub mod input_key;
pub mod log_buffer;
pub mod message;
pub mod process;
pub mod registry;
pub mod scan;
pub mod signals;
pub mod state;

// Re-export primary types
pub use compare::{CompareSession, Controls, Transition};
pub use engine::{Engine, EngineOptions};
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use log_buffer::LogBuffer;
pub use message::{CompareCall, Message, PullRequest};
pub use registry::DeviceRegistry;
pub use scan::{ScanController, ScanPolicy};
pub use state::{AppState, BridgeStatus, Panel};

// Re-export bridge types for the runners
pub use routerlab_bridge::{BridgeClient, BridgeConfig, BridgeHandle};
