//! # routerlab-core - Core Domain Types
//!
//! Foundation crate for routerlab. Provides the domain types shared by the
//! bridge, application and presentation crates, plus error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`DeviceRecord`] - One discovered device: optional MAC address and liveness
//! - [`DeviceStatus`] - Liveness as last reported (`up` / `down`)
//! - [`ComparePhase`] - Phase of the compare control loop (Idle, Running, Stopped)
//! - [`RouterInfo`] - Locally edited router identity fields
//! - [`AppPhase`] - Lifecycle of the panel itself (Running, Quitting)
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use routerlab_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all routerlab crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use types::{AppPhase, ComparePhase, DeviceRecord, DeviceStatus, RouterInfo, SELF_DEVICE_ID};
