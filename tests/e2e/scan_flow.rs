//! Device scans against the mock host

use std::time::Duration;

use serde_json::json;

use routerlab_app::{Message, ScanPolicy};
use routerlab_bridge::test_utils::{MockHost, MockReply};
use routerlab_core::{DeviceStatus, SELF_DEVICE_ID};

use crate::{connect_engine, connect_engine_with, pump_until, settle};

fn two_devices() -> serde_json::Value {
    json!({
        "host-a": {"self": true, "addresses": {"mac": "00:00:00:00:00:01"}},
        "dev-1": {"addresses": {"mac": "aa:bb:cc:dd:ee:ff"}}
    })
}

#[tokio::test]
async fn test_scan_populates_registry() {
    let mock = MockHost::start().await;
    mock.on("get_scan_results", MockReply::ok(two_devices()));
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::RequestScan);
    pump_until(&mut engine, |e| e.state.registry.len() == 2).await;

    let me = engine.state.registry.get(SELF_DEVICE_ID).expect("self entry");
    assert_eq!(me.address, None);

    let dev = engine.state.registry.get("dev-1").expect("dev-1");
    assert_eq!(dev.address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    assert_eq!(dev.status, DeviceStatus::Up);
    assert_eq!(mock.call_count("get_scan_results"), 1);
}

#[tokio::test]
async fn test_failed_scan_leaves_registry_empty() {
    let mock = MockHost::start().await;
    mock.once("get_scan_results", MockReply::ok(two_devices()));
    mock.on("get_scan_results", MockReply::error("interface down"));
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::RequestScan);
    pump_until(&mut engine, |e| e.state.registry.len() == 2).await;

    engine.process_message(Message::RequestScan);
    pump_until(&mut engine, |e| e.state.last_error().is_some()).await;

    assert!(engine.state.registry.is_empty());
    assert!(engine
        .state
        .last_error()
        .is_some_and(|e| e.contains("interface down")));
}

#[tokio::test]
async fn test_malformed_scan_reply_is_rejected() {
    let mock = MockHost::start().await;
    mock.on(
        "get_scan_results",
        MockReply::ok(json!({"dev-1": {"addresses": "aa:bb"}})),
    );
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::RequestScan);
    pump_until(&mut engine, |e| e.state.last_error().is_some()).await;

    assert!(engine.state.registry.is_empty());
    assert!(!engine.state.scans.is_scanning());
}

#[tokio::test]
async fn test_serialize_policy_queues_second_scan() {
    let mock = MockHost::start().await;
    mock.once(
        "get_scan_results",
        MockReply::delayed(
            Duration::from_millis(200),
            MockReply::ok(json!({"old": {"addresses": {}}})),
        ),
    );
    mock.on(
        "get_scan_results",
        MockReply::ok(json!({"new": {"addresses": {}}})),
    );
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::RequestScan);
    engine.process_message(Message::RequestScan);
    engine.process_message(Message::RequestScan);

    // Only one call goes out while the first is pending
    mock.wait_for_calls("get_scan_results", 1).await;
    settle(&mut engine, Duration::from_millis(50)).await;
    assert_eq!(mock.call_count("get_scan_results"), 1);

    pump_until(&mut engine, |e| e.state.registry.contains("new")).await;
    settle(&mut engine, Duration::from_millis(100)).await;

    assert_eq!(mock.call_count("get_scan_results"), 2);
    assert!(!engine.state.registry.contains("old"));
    assert_eq!(engine.state.registry.len(), 1);
}

#[tokio::test]
async fn test_race_policy_applies_replies_in_arrival_order() {
    let mock = MockHost::start().await;
    mock.once(
        "get_scan_results",
        MockReply::delayed(
            Duration::from_millis(300),
            MockReply::ok(json!({"slow": {"addresses": {}}})),
        ),
    );
    mock.on(
        "get_scan_results",
        MockReply::ok(json!({"fast": {"addresses": {}}})),
    );
    let mut engine = connect_engine_with(&mock, ScanPolicy::Race).await;

    engine.process_message(Message::RequestScan);
    mock.wait_for_calls("get_scan_results", 1).await;
    engine.process_message(Message::RequestScan);

    pump_until(&mut engine, |e| e.state.registry.contains("fast")).await;
    pump_until(&mut engine, |e| e.state.registry.contains("slow")).await;

    // The later arrival replaced the earlier one
    assert!(!engine.state.registry.contains("fast"));
    assert_eq!(mock.call_count("get_scan_results"), 2);
}
