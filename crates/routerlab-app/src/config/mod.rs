//! Configuration file parsing for routerlab
//!
//! Supports:
//! - `.routerlab/config.toml` - Project settings
//! - `<config dir>/routerlab/config.toml` - Per-user fallback

pub mod settings;
pub mod types;

pub use settings::{
    apply_host_override, init_config_dir, load_settings, load_settings_file,
    project_config_path, user_config_path, HOST_ENV_VAR,
};
pub use types::*;
