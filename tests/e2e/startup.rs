//! Engine start-up: settings lookup, host overrides and an absent host

use serde_json::json;
use serial_test::serial;
use tempfile::tempdir;

use routerlab_app::config::HOST_ENV_VAR;
use routerlab_app::{Engine, EngineOptions};
use routerlab_bridge::test_utils::{MockHost, MockReply};

use crate::pump_until;

/// Nothing listens on port 1, so connecting fails at once.
const DEAD_HOST: &str = "ws://127.0.0.1:1/eel";

fn write_config(dir: &std::path::Path, host_url: &str, scan_on_start: bool) -> std::path::PathBuf {
    let routerlab_dir = dir.join(".routerlab");
    std::fs::create_dir_all(&routerlab_dir).unwrap();
    let path = routerlab_dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[bridge]\nhost_url = \"{host_url}\"\ncall_timeout_ms = 2000\n\n\
             [scan]\nscan_on_start = {scan_on_start}\n"
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
#[serial]
async fn test_project_config_is_used_and_scans_on_start() {
    std::env::remove_var(HOST_ENV_VAR);
    let mock = MockHost::start().await;
    mock.on(
        "get_scan_results",
        MockReply::ok(json!({"dev-1": {"addresses": {}}})),
    );
    let dir = tempdir().unwrap();
    write_config(dir.path(), &mock.url(), true);

    let mut engine = Engine::new(EngineOptions {
        project_path: dir.path().to_path_buf(),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(engine.settings.bridge.host_url, mock.url());
    pump_until(&mut engine, |e| e.state.registry.contains("dev-1")).await;
    engine.shutdown().await;
}

#[tokio::test]
#[serial]
async fn test_host_flag_overrides_environment() {
    let mock = MockHost::start().await;
    std::env::set_var(HOST_ENV_VAR, DEAD_HOST);
    let dir = tempdir().unwrap();

    let result = Engine::new(EngineOptions {
        project_path: dir.path().to_path_buf(),
        host_override: Some(mock.url()),
        ..Default::default()
    })
    .await;
    std::env::remove_var(HOST_ENV_VAR);

    let mut engine = result.unwrap();
    assert_eq!(engine.settings.bridge.host_url, mock.url());
    assert!(!engine.state.bridge.is_down());
    engine.shutdown().await;
}

#[tokio::test]
#[serial]
async fn test_unreachable_host_starts_offline() {
    std::env::remove_var(HOST_ENV_VAR);
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), DEAD_HOST, true);

    let mut engine = Engine::new(EngineOptions {
        project_path: dir.path().to_path_buf(),
        config_path: Some(config),
        host_override: None,
    })
    .await
    .unwrap();

    assert!(engine.state.bridge.is_down());
    assert!(engine.state.last_error().is_some());
    // No scan is attempted against a host that is not there
    assert!(!engine.state.scans.is_scanning());
    engine.shutdown().await;
}

#[tokio::test]
#[serial]
async fn test_invalid_host_url_is_rejected() {
    std::env::remove_var(HOST_ENV_VAR);
    let dir = tempdir().unwrap();

    let result = Engine::new(EngineOptions {
        project_path: dir.path().to_path_buf(),
        host_override: Some("http://localhost:8080/eel".to_string()),
        ..Default::default()
    })
    .await;

    assert!(result.is_err());
}
