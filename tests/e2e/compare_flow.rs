//! Compare session lifecycle against the mock host

use std::time::Duration;

use serde_json::{json, Value};

use routerlab_app::Message;
use routerlab_bridge::test_utils::{MockHost, MockReply};
use routerlab_core::ComparePhase;

use crate::{connect_engine, pump_until, pump_while, settle};

async fn compare_host() -> MockHost {
    let mock = MockHost::start().await;
    mock.on("start_compare", MockReply::ok(Value::Null));
    mock.on("stop_compare", MockReply::ok(Value::Null));
    mock.on("save_log", MockReply::ok(Value::Null));
    mock
}

#[tokio::test]
async fn test_full_compare_cycle() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::StartCompare);
    assert_eq!(engine.state.compare.phase(), ComparePhase::Running);
    mock.wait_for_calls("start_compare", 1).await;

    mock.push("update_output", vec![json!("foo")]).unwrap();
    mock.push("update_output", vec![json!("bar")]).unwrap();
    pump_until(&mut engine, |e| e.state.compare.output() == "foobar").await;

    engine.process_message(Message::StopCompare);
    assert_eq!(engine.state.compare.phase(), ComparePhase::Stopped);
    assert!(engine.state.compare.can_save());
    mock.wait_for_calls("stop_compare", 1).await;

    // The host reads the transcript back when saving
    let output = pump_while(&mut engine, mock.call_panel("get_output", vec![])).await;
    assert_eq!(output.unwrap(), json!("foobar"));

    engine.process_message(Message::SaveLog);
    mock.wait_for_calls("save_log", 1).await;

    assert_eq!(
        mock.call_names(),
        vec!["start_compare", "stop_compare", "save_log"]
    );
}

#[tokio::test]
async fn test_restart_clears_transcript() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::StartCompare);
    mock.push("update_output", vec![json!("first run")]).unwrap();
    pump_until(&mut engine, |e| !e.state.compare.output().is_empty()).await;
    engine.process_message(Message::StopCompare);

    engine.process_message(Message::StartCompare);
    assert_eq!(engine.state.compare.output(), "");

    let output = pump_while(&mut engine, mock.call_panel("get_output", vec![])).await;
    assert_eq!(output.unwrap(), json!(""));
}

#[tokio::test]
async fn test_double_start_calls_host_once() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::StartCompare);
    engine.process_message(Message::StartCompare);
    mock.wait_for_calls("start_compare", 1).await;
    settle(&mut engine, Duration::from_millis(100)).await;

    assert_eq!(mock.call_count("start_compare"), 1);
    assert_eq!(engine.state.compare.phase(), ComparePhase::Running);
}

#[tokio::test]
async fn test_failed_start_rolls_back() {
    let mock = MockHost::start().await;
    mock.on("start_compare", MockReply::error("no router attached"));
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::StartCompare);
    assert_eq!(engine.state.compare.phase(), ComparePhase::Running);

    pump_until(&mut engine, |e| e.state.last_error().is_some()).await;
    assert_eq!(engine.state.compare.phase(), ComparePhase::Idle);
    assert!(engine
        .state
        .last_error()
        .is_some_and(|e| e.contains("no router attached")));
}

#[tokio::test]
async fn test_save_before_stop_is_ignored() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::SaveLog);
    engine.process_message(Message::StartCompare);
    engine.process_message(Message::SaveLog);
    mock.wait_for_calls("start_compare", 1).await;
    settle(&mut engine, Duration::from_millis(100)).await;

    assert_eq!(mock.call_count("save_log"), 0);
}

#[tokio::test]
async fn test_start_refused_after_host_goes_away() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    mock.drop_connection();
    pump_until(&mut engine, |e| e.state.bridge.is_down()).await;

    engine.process_message(Message::StartCompare);
    assert_eq!(engine.state.compare.phase(), ComparePhase::Idle);
    assert_eq!(mock.call_count("start_compare"), 0);
}

#[tokio::test]
async fn test_output_burst_is_kept_in_order_while_loop_is_busy() {
    let mock = compare_host().await;
    let mut engine = connect_engine(&mock).await;

    engine.process_message(Message::StartCompare);
    mock.wait_for_calls("start_compare", 1).await;

    let expected: String = (0..1000).map(|i| format!("{i},")).collect();
    for i in 0..1000 {
        mock.push("update_output", vec![json!(format!("{i},"))])
            .unwrap();
    }

    // The update loop is stalled, as it would be mid-draw
    tokio::time::sleep(Duration::from_millis(1500)).await;

    pump_until(&mut engine, |e| e.state.compare.log().chunks().len() >= 1000).await;
    assert_eq!(engine.state.compare.log().chunks().len(), 1000);
    assert_eq!(engine.state.compare.output(), expected);
}
