//! Settings loader for .routerlab/config.toml

use std::path::{Path, PathBuf};

use routerlab_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const ROUTERLAB_DIR: &str = ".routerlab";

/// Environment variable overriding `bridge.host_url`.
pub const HOST_ENV_VAR: &str = "ROUTERLAB_HOST";

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Path of the project-local config file.
pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(ROUTERLAB_DIR).join(CONFIG_FILENAME)
}

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("routerlab").join(CONFIG_FILENAME))
}

/// Load settings for `project_path`.
///
/// Reads `.routerlab/config.toml` in the project, falling back to the
/// per-user config file, then to defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let project = project_config_path(project_path);
    if project.exists() {
        return load_settings_file(&project);
    }

    match user_config_path() {
        Some(user) if user.exists() => load_settings_file(&user),
        _ => {
            debug!("No config file at {:?}, using defaults", project);
            Settings::default()
        }
    }
}

/// Load settings from an explicit file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings_file(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply host endpoint overrides and validate the result.
///
/// `ROUTERLAB_HOST` replaces the configured URL, and `cli_host` (the
/// `--host` flag) replaces both.
///
/// # Errors
///
/// [`Error::ConfigInvalid`] if the resulting URL is not a `ws`/`wss` URL.
pub fn apply_host_override(settings: &mut Settings, cli_host: Option<&str>) -> Result<()> {
    if let Ok(env_host) = std::env::var(HOST_ENV_VAR) {
        let env_host = env_host.trim();
        if !env_host.is_empty() {
            debug!("Host URL from {}: {}", HOST_ENV_VAR, env_host);
            settings.bridge.host_url = env_host.to_string();
        }
    }

    if let Some(cli_host) = cli_host {
        debug!("Host URL from --host: {}", cli_host);
        settings.bridge.host_url = cli_host.trim().to_string();
    }

    routerlab_bridge::validate_host_url(&settings.bridge.host_url)?;
    Ok(())
}

/// Create a commented default config file in .routerlab/
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let routerlab_dir = project_path.join(ROUTERLAB_DIR);

    if !routerlab_dir.exists() {
        std::fs::create_dir_all(&routerlab_dir)
            .map_err(|e| Error::config(format!("Failed to create .routerlab dir: {}", e)))?;
    }

    let config_path = routerlab_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# routerlab configuration

[bridge]
host_url = "ws://localhost:8080/eel"   # Overridden by ROUTERLAB_HOST and --host
call_timeout_ms = 30000
max_reconnect_attempts = 0             # 0 = calls fail once the host is gone

[scan]
policy = "serialize"    # "serialize" queues a scan behind a pending one, "race" sends it at once
scan_on_start = false

[ui]
show_timestamps = true  # Timestamp headless JSON events
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Wrote default config to {:?}", config_path);
    }

    Ok(())
}
