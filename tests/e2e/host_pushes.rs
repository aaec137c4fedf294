//! Calls the host makes into the panel

use std::path::PathBuf;

use serde_json::json;

use routerlab_app::{BridgeClient, Engine, Message, ScanPolicy};
use routerlab_bridge::test_utils::{MockHost, MockReply};
use routerlab_core::DeviceStatus;

use crate::{connect_engine, pump_until, pump_while, settings_for};

#[tokio::test]
async fn test_status_pushes_update_registry() {
    let mock = MockHost::start().await;
    mock.on(
        "get_scan_results",
        MockReply::ok(json!({
            "dev-1": {"addresses": {"mac": "aa:bb"}},
            "dev-2": {"addresses": {}}
        })),
    );
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::RequestScan);
    pump_until(&mut engine, |e| e.state.registry.len() == 2).await;

    mock.push("update_status", vec![json!("dev-1"), json!("down")])
        .unwrap();
    mock.push("update_status", vec![json!("ghost"), json!("down")])
        .unwrap();
    mock.push("update_status", vec![json!("dev-2"), json!("down")])
        .unwrap();
    mock.push("update_status", vec![json!("dev-2"), json!("up")])
        .unwrap();

    // Pushes apply in the order sent, so once dev-1 is down and dev-2 has
    // come back up every push has landed
    pump_until(&mut engine, |e| {
        e.state.registry.get("dev-1").map(|d| d.status) == Some(DeviceStatus::Down)
            && e.state.registry.get("dev-2").map(|d| d.status) == Some(DeviceStatus::Up)
            && e.state.registry.up_count() == 1
    })
    .await;

    assert!(!engine.state.registry.contains("ghost"));
    assert_eq!(engine.state.registry.len(), 2);
}

#[tokio::test]
async fn test_bad_status_is_answered_with_error() {
    let mock = MockHost::start().await;
    let mut engine = connect_engine(&mock).await;

    let reply = pump_while(
        &mut engine,
        mock.call_panel("update_status", vec![json!("dev-1"), json!("sideways")]),
    )
    .await;

    assert!(reply.is_err());
}

#[tokio::test]
async fn test_host_reads_router_info() {
    let mock = MockHost::start().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::NextPanel);
    engine.process_message(Message::NextPanel);
    for c in "RT-9000".chars() {
        engine.process_message(Message::FormInput(c));
    }
    let model = engine.state.router_info.info().model_number.clone();

    let info = pump_while(&mut engine, mock.call_panel("get_router_info", vec![]))
        .await
        .unwrap();

    assert_eq!(info["modelNumber"], json!(model));
    assert!(info.get("serialNumber").is_some());
    assert!(info.get("firmwareVersion").is_some());
}

#[tokio::test]
async fn test_host_reads_scan_interval() {
    let mock = MockHost::start().await;
    let mut engine = connect_engine(&mock).await;

    let interval = pump_while(&mut engine, mock.call_panel("get_scan_interval", vec![]))
        .await
        .unwrap();

    assert_eq!(
        interval,
        json!(engine.state.settings_form.scan_interval())
    );
}

#[tokio::test]
async fn test_router_info_fetch_fills_form() {
    let mock = MockHost::start().await;
    mock.on(
        "getDeviceInfo",
        MockReply::ok(json!({
            "modelNumber": "RT-1",
            "serialNumber": "SN-42",
            "firmwareVersion": "1.2.3"
        })),
    );
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::FetchRouterInfo);
    pump_until(&mut engine, |e| !e.state.router_info.fetching).await;

    let info = engine.state.router_info.info();
    assert_eq!(info.model_number, "RT-1");
    assert_eq!(info.serial_number, "SN-42");
    assert_eq!(info.firmware_version, "1.2.3");
}

#[tokio::test]
async fn test_push_before_handlers_exposed_is_dropped() {
    let mock = MockHost::start().await;
    let settings = settings_for(&mock, ScanPolicy::Serialize);
    let client = BridgeClient::connect(settings.bridge.to_bridge_config())
        .await
        .expect("connect to mock host");
    mock.wait_for_connection().await;

    // Nothing is exposed yet: the host gets an error and nothing is kept
    let early = mock.call_panel("update_output", vec![json!("early")]).await;
    assert!(early.is_err());

    let mut engine = Engine::with_bridge(settings, PathBuf::from("."), client);
    mock.push("update_output", vec![json!("late")]).unwrap();
    pump_until(&mut engine, |e| !e.state.compare.output().is_empty()).await;

    assert_eq!(engine.state.compare.output(), "late");
}
