//! Tests for handler module

use super::*;
use crate::config::Settings;
use crate::input_key::InputKey;
use crate::message::{CompareCall, Message, PullRequest};
use crate::scan::ScanPolicy;
use crate::state::{AppState, BridgeStatus, Panel};
use routerlab_core::{AppPhase, ComparePhase, DeviceRecord, DeviceStatus, RouterInfo};
use serde_json::{json, Value};
use tokio::sync::oneshot;

fn record(id: &str, mac: Option<&str>) -> DeviceRecord {
    DeviceRecord::discovered(id, mac.map(str::to_string))
}

fn self_and_one() -> Vec<DeviceRecord> {
    vec![record("SELF", None), record("dev-1", Some("aa:bb"))]
}

fn state_with_policy(policy: ScanPolicy) -> AppState {
    let mut settings = Settings::default();
    settings.scan.policy = policy;
    AppState::with_settings(settings)
}

fn pull(state: &mut AppState, request: PullRequest) -> Value {
    let (tx, mut rx) = oneshot::channel();
    update(state, Message::HostPull { request, reply: tx });
    rx.try_recv().expect("pull answered synchronously")
}

fn scan_id_of(result: &UpdateResult) -> u64 {
    match result.action {
        Some(UpdateAction::ScanDevices { scan_id }) => scan_id,
        ref other => panic!("expected ScanDevices, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────
// Quit & keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    assert_ne!(state.phase, AppPhase::Quitting);

    update(&mut state, Message::Quit);

    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
}

#[test]
fn test_key_produces_follow_up_message() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Key(InputKey::Char('s')));
    assert!(matches!(result.message, Some(Message::RequestScan)));
    assert!(result.action.is_none());
}

#[test]
fn test_unbound_key_does_nothing() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Key(InputKey::Char('z')));
    assert!(result.message.is_none());
    assert!(result.action.is_none());
}

// ─────────────────────────────────────────────────────────
// Scan
// ─────────────────────────────────────────────────────────

#[test]
fn test_scan_reply_populates_registry() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::RequestScan);
    let scan_id = scan_id_of(&result);

    update(
        &mut state,
        Message::ScanFinished {
            scan_id,
            result: Ok(self_and_one()),
        },
    );

    assert_eq!(state.registry.len(), 2);
    let dev = state.registry.get("dev-1").unwrap();
    assert_eq!(dev.address.as_deref(), Some("aa:bb"));
    assert_eq!(dev.status, DeviceStatus::Up);
    assert!(state.registry.get("SELF").unwrap().address.is_none());
    assert!(!state.scans.is_scanning());
}

#[test]
fn test_request_scan_clears_registry_immediately() {
    let mut state = AppState::new();
    state.registry.replace(self_and_one());

    update(&mut state, Message::RequestScan);

    assert!(state.registry.is_empty());
}

#[test]
fn test_failed_scan_leaves_registry_empty() {
    let mut state = AppState::new();
    state.registry.replace(self_and_one());
    let scan_id = scan_id_of(&update(&mut state, Message::RequestScan));

    update(
        &mut state,
        Message::ScanFinished {
            scan_id,
            result: Err("host unavailable".into()),
        },
    );

    assert!(state.registry.is_empty());
    assert!(state.last_error().unwrap().contains("host unavailable"));
    assert_eq!(state.error_count, 1);
}

#[test]
fn test_serialize_policy_queues_second_scan() {
    let mut state = state_with_policy(ScanPolicy::Serialize);
    let first = scan_id_of(&update(&mut state, Message::RequestScan));

    let queued = update(&mut state, Message::RequestScan);
    assert!(queued.action.is_none());
    // Coalesced: a third request does not queue another scan
    assert!(update(&mut state, Message::RequestScan).action.is_none());

    let result = update(
        &mut state,
        Message::ScanFinished {
            scan_id: first,
            result: Ok(self_and_one()),
        },
    );
    let second = scan_id_of(&result);
    assert_ne!(first, second);
    // Results of the superseded scan are dropped when the queued one goes out
    assert!(state.registry.is_empty());

    let done = update(
        &mut state,
        Message::ScanFinished {
            scan_id: second,
            result: Ok(vec![record("dev-2", None)]),
        },
    );
    assert!(done.action.is_none());
    assert_eq!(state.registry.len(), 1);
    assert!(state.registry.contains("dev-2"));
}

#[test]
fn test_race_policy_applies_replies_in_arrival_order() {
    let mut state = state_with_policy(ScanPolicy::Race);
    let first = scan_id_of(&update(&mut state, Message::RequestScan));
    let second = scan_id_of(&update(&mut state, Message::RequestScan));
    assert_eq!(state.scans.in_flight(), 2);

    // Second reply arrives first; the first one lands last and wins
    update(
        &mut state,
        Message::ScanFinished {
            scan_id: second,
            result: Ok(vec![record("dev-2", None)]),
        },
    );
    update(
        &mut state,
        Message::ScanFinished {
            scan_id: first,
            result: Ok(vec![record("dev-1", None)]),
        },
    );

    assert_eq!(state.registry.len(), 1);
    assert!(state.registry.contains("dev-1"));
    assert!(!state.scans.is_scanning());
}

// ─────────────────────────────────────────────────────────
// Status pushes
// ─────────────────────────────────────────────────────────

#[test]
fn test_status_push_updates_known_device() {
    let mut state = AppState::new();
    state.registry.replace(self_and_one());

    update(
        &mut state,
        Message::HostStatus {
            id: "dev-1".into(),
            status: DeviceStatus::Down,
        },
    );

    assert_eq!(
        state.registry.get("dev-1").unwrap().status,
        DeviceStatus::Down
    );
}

#[test]
fn test_status_push_for_unknown_device_is_ignored() {
    let mut state = AppState::new();
    state.registry.replace(self_and_one());
    let revision = state.registry.revision();

    update(
        &mut state,
        Message::HostStatus {
            id: "ghost".into(),
            status: DeviceStatus::Up,
        },
    );

    assert!(!state.registry.contains("ghost"));
    assert_eq!(state.registry.revision(), revision);
    assert_eq!(state.error_count, 0);
}

// ─────────────────────────────────────────────────────────
// Compare
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_fires_and_clears_transcript() {
    let mut state = AppState::new();
    state.compare.append_output("old");

    let result = update(&mut state, Message::StartCompare);

    assert_eq!(state.compare.phase(), ComparePhase::Running);
    assert_eq!(state.compare.output(), "");
    assert!(matches!(
        result.action,
        Some(UpdateAction::FireCompare {
            call: CompareCall::Start,
            transition: Some(_)
        })
    ));
}

#[test]
fn test_second_start_while_running_is_noop() {
    let mut state = AppState::new();
    update(&mut state, Message::StartCompare);
    update(&mut state, Message::HostOutput("foo".into()));

    let result = update(&mut state, Message::StartCompare);

    assert!(result.action.is_none());
    assert_eq!(state.compare.output(), "foo");
    assert_eq!(state.compare.phase(), ComparePhase::Running);
}

#[test]
fn test_stop_only_from_running() {
    let mut state = AppState::new();
    assert!(update(&mut state, Message::StopCompare).action.is_none());
    assert_eq!(state.compare.phase(), ComparePhase::Idle);

    update(&mut state, Message::StartCompare);
    let result = update(&mut state, Message::StopCompare);
    assert!(matches!(
        result.action,
        Some(UpdateAction::FireCompare {
            call: CompareCall::Stop,
            ..
        })
    ));
    assert!(state.compare.can_save());
}

#[test]
fn test_save_requires_a_stopped_session() {
    let mut state = AppState::new();
    assert!(update(&mut state, Message::SaveLog).action.is_none());

    update(&mut state, Message::StartCompare);
    assert!(update(&mut state, Message::SaveLog).action.is_none());

    update(&mut state, Message::StopCompare);
    let result = update(&mut state, Message::SaveLog);
    assert_eq!(
        result.action,
        Some(UpdateAction::FireCompare {
            call: CompareCall::Save,
            transition: None
        })
    );
}

#[test]
fn test_output_pushes_are_pulled_back_in_order() {
    let mut state = AppState::new();
    update(&mut state, Message::StartCompare);
    update(&mut state, Message::HostOutput("foo".into()));
    update(&mut state, Message::HostOutput("bar".into()));
    update(&mut state, Message::StopCompare);

    assert_eq!(pull(&mut state, PullRequest::Output), json!("foobar"));
    assert!(update(&mut state, Message::SaveLog).action.is_some());
}

#[test]
fn test_failed_start_rolls_back() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::StartCompare);
    let Some(UpdateAction::FireCompare { call, transition }) = result.action else {
        panic!("expected FireCompare");
    };

    update(
        &mut state,
        Message::CompareCallFinished {
            call,
            transition,
            result: Err("host unavailable".into()),
        },
    );

    assert_eq!(state.compare.phase(), ComparePhase::Idle);
    assert!(state.last_error().unwrap().starts_with("Start failed"));
}

#[test]
fn test_failed_stop_restores_running() {
    let mut state = AppState::new();
    update(&mut state, Message::StartCompare);
    let Some(UpdateAction::FireCompare { call, transition }) =
        update(&mut state, Message::StopCompare).action
    else {
        panic!("expected FireCompare");
    };

    update(
        &mut state,
        Message::CompareCallFinished {
            call,
            transition,
            result: Err("boom".into()),
        },
    );

    assert_eq!(state.compare.phase(), ComparePhase::Running);
    assert!(!state.compare.can_save());
}

#[test]
fn test_stale_failure_does_not_roll_back_newer_phase() {
    let mut state = AppState::new();
    let Some(UpdateAction::FireCompare { transition, .. }) =
        update(&mut state, Message::StartCompare).action
    else {
        panic!("expected FireCompare");
    };
    update(&mut state, Message::StopCompare);

    update(
        &mut state,
        Message::CompareCallFinished {
            call: CompareCall::Start,
            transition,
            result: Err("late".into()),
        },
    );

    assert_eq!(state.compare.phase(), ComparePhase::Stopped);
    assert!(state.compare.can_save());
}

#[test]
fn test_stale_start_failure_keeps_later_start_running() {
    let mut state = AppState::new();
    let Some(UpdateAction::FireCompare {
        transition: first, ..
    }) = update(&mut state, Message::StartCompare).action
    else {
        panic!("expected FireCompare");
    };
    update(&mut state, Message::HostOutput("first run".into()));
    update(&mut state, Message::StopCompare);
    update(&mut state, Message::StartCompare);
    update(&mut state, Message::HostOutput("second run".into()));

    update(
        &mut state,
        Message::CompareCallFinished {
            call: CompareCall::Start,
            transition: first,
            result: Err("late".into()),
        },
    );

    assert_eq!(state.compare.phase(), ComparePhase::Running);

    // Still running, so a further Start neither reaches the host nor
    // clears the live transcript
    let again = update(&mut state, Message::StartCompare);
    assert!(again.action.is_none());
    assert_eq!(pull(&mut state, PullRequest::Output), json!("second run"));
}

#[test]
fn test_compare_refused_while_host_down() {
    let mut state = AppState::new();
    state.bridge = BridgeStatus::Disconnected {
        reason: "closed".into(),
    };

    let result = update(&mut state, Message::StartCompare);

    assert!(result.action.is_none());
    assert_eq!(state.compare.phase(), ComparePhase::Idle);
    assert!(state.last_error().is_some());
}

#[test]
fn test_output_accepted_in_any_phase() {
    let mut state = AppState::new();
    update(&mut state, Message::HostOutput("early".into()));
    assert_eq!(pull(&mut state, PullRequest::Output), json!("early"));
}

// ─────────────────────────────────────────────────────────
// Router info & pulls
// ─────────────────────────────────────────────────────────

#[test]
fn test_router_info_fetch_round() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::FetchRouterInfo);
    assert_eq!(result.action, Some(UpdateAction::FetchRouterInfo));
    assert!(state.router_info.fetching);

    // Already in flight
    assert!(update(&mut state, Message::FetchRouterInfo).action.is_none());

    let info = RouterInfo {
        model_number: "RT-1".into(),
        firmware_version: "1.2".into(),
        hardware_version: "B".into(),
        serial_number: "SN9".into(),
    };
    update(&mut state, Message::RouterInfoFetched(Ok(info.clone())));

    assert!(!state.router_info.fetching);
    assert_eq!(state.router_info.info(), &info);
    assert_eq!(
        pull(&mut state, PullRequest::RouterInfo),
        json!({
            "modelNumber": "RT-1",
            "firmwareVersion": "1.2",
            "hardwareVersion": "B",
            "serialNumber": "SN9"
        })
    );
}

#[test]
fn test_router_info_failure_keeps_fields() {
    let mut state = AppState::new();
    state.panel = Panel::RouterInfo;
    update(&mut state, Message::FormInput('X'));
    update(&mut state, Message::FetchRouterInfo);

    update(&mut state, Message::RouterInfoFetched(Err("nope".into())));

    assert_eq!(state.router_info.info().model_number, "X");
    assert!(state.last_error().is_some());
}

#[test]
fn test_scan_interval_pull_is_clamped() {
    let mut state = AppState::new();
    assert_eq!(pull(&mut state, PullRequest::ScanInterval), json!(30));

    state.panel = Panel::Settings;
    update(&mut state, Message::FormBackspace);
    update(&mut state, Message::FormBackspace);
    update(&mut state, Message::FormInput('5'));

    assert_eq!(pull(&mut state, PullRequest::ScanInterval), json!(10));
}

// ─────────────────────────────────────────────────────────
// Bridge status & navigation
// ─────────────────────────────────────────────────────────

#[test]
fn test_disconnect_reports_error() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::BridgeStatusChanged(BridgeStatus::Disconnected {
            reason: "closed".into(),
        }),
    );
    assert!(state.bridge.is_down());
    assert!(state.last_error().unwrap().contains("closed"));

    update(&mut state, Message::BridgeStatusChanged(BridgeStatus::Connected));
    assert!(!state.bridge.is_down());
    assert!(state.last_error().is_none());
}

#[test]
fn test_panel_navigation() {
    let mut state = AppState::new();
    update(&mut state, Message::NextPanel);
    assert_eq!(state.panel, Panel::Compare);
    update(&mut state, Message::PrevPanel);
    update(&mut state, Message::PrevPanel);
    assert_eq!(state.panel, Panel::Settings);
}

#[test]
fn test_form_input_routes_to_focused_panel() {
    let mut state = AppState::new();
    state.panel = Panel::RouterInfo;
    update(&mut state, Message::FocusNextField);
    update(&mut state, Message::FormInput('7'));

    assert_eq!(state.router_info.info().firmware_version, "7");
    assert_eq!(state.router_info.info().model_number, "");

    // Ignored outside form panels
    state.panel = Panel::Devices;
    update(&mut state, Message::FormInput('8'));
    assert_eq!(state.router_info.info().firmware_version, "7");
}
