//! Main update function - handles state transitions (TEA pattern)

use serde_json::Value;
use tracing::{debug, warn};

use routerlab_core::{AppPhase, DeviceRecord};

use crate::compare::Transition;
use crate::message::{CompareCall, Message, PullRequest};
use crate::scan::{ScanDecision, ScanId};
use crate::state::{AppState, BridgeStatus, Panel};

use super::{keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Scan
        // ─────────────────────────────────────────────────────────
        Message::RequestScan => handle_request_scan(state),

        Message::ScanFinished { scan_id, result } => handle_scan_finished(state, scan_id, result),

        // ─────────────────────────────────────────────────────────
        // Compare
        // ─────────────────────────────────────────────────────────
        Message::StartCompare => {
            if refuse_while_down(state, CompareCall::Start) {
                return UpdateResult::none();
            }
            match state.compare.start() {
                Some(transition) => fire(CompareCall::Start, Some(transition)),
                None => {
                    debug!("start ignored, compare already running");
                    UpdateResult::none()
                }
            }
        }

        Message::StopCompare => {
            if refuse_while_down(state, CompareCall::Stop) {
                return UpdateResult::none();
            }
            match state.compare.stop() {
                Some(transition) => fire(CompareCall::Stop, Some(transition)),
                None => {
                    debug!("stop ignored, compare is {}", state.compare.phase());
                    UpdateResult::none()
                }
            }
        }

        Message::SaveLog => {
            if state.compare.can_save() {
                fire(CompareCall::Save, None)
            } else {
                debug!("save ignored, nothing to save");
                UpdateResult::none()
            }
        }

        Message::CompareCallFinished {
            call,
            transition,
            result,
        } => handle_compare_call_finished(state, call, transition, result),

        // ─────────────────────────────────────────────────────────
        // Router info
        // ─────────────────────────────────────────────────────────
        Message::FetchRouterInfo => {
            if state.router_info.fetching {
                return UpdateResult::none();
            }
            state.router_info.fetching = true;
            UpdateResult::action(UpdateAction::FetchRouterInfo)
        }

        Message::RouterInfoFetched(result) => {
            state.router_info.fetching = false;
            match result {
                Ok(info) => {
                    state.router_info.merge(info);
                    state.report_info("Router info loaded");
                }
                Err(e) => {
                    warn!("getDeviceInfo failed: {}", e);
                    state.report_error(format!("Router info unavailable: {e}"));
                }
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Host-initiated calls
        // ─────────────────────────────────────────────────────────
        Message::HostOutput(chunk) => {
            state.compare.append_output(chunk);
            UpdateResult::none()
        }

        Message::HostStatus { id, status } => {
            if !state.registry.set_status(&id, status) {
                debug!("status for unknown device '{}' dropped", id);
            }
            UpdateResult::none()
        }

        Message::HostPull { request, reply } => {
            let value = pull_value(state, request);
            if reply.send(value).is_err() {
                debug!("pull {:?} answered after the caller went away", request);
            }
            UpdateResult::none()
        }

        Message::BridgeStatusChanged(status) => {
            match &status {
                BridgeStatus::Disconnected { reason } => {
                    state.report_error(format!("Host unavailable: {reason}"));
                }
                BridgeStatus::Reconnecting {
                    attempt,
                    max_attempts,
                } => {
                    state.report_info(format!(
                        "Connection lost, reconnecting ({attempt}/{max_attempts})"
                    ));
                }
                BridgeStatus::Connected if state.bridge.is_down() => {
                    state.report_info("Host reconnected");
                }
                BridgeStatus::Connected => {}
            }
            state.bridge = status;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation & forms
        // ─────────────────────────────────────────────────────────
        Message::NextPanel => {
            state.panel = state.panel.next();
            UpdateResult::none()
        }

        Message::PrevPanel => {
            state.panel = state.panel.prev();
            UpdateResult::none()
        }

        Message::FocusNextField => {
            match state.panel {
                Panel::RouterInfo => {
                    state.router_info.focused = state.router_info.focused.next();
                }
                Panel::Settings => state.settings_form.focus_next(),
                _ => {}
            }
            UpdateResult::none()
        }

        Message::FocusPrevField => {
            match state.panel {
                Panel::RouterInfo => {
                    state.router_info.focused = state.router_info.focused.prev();
                }
                Panel::Settings => state.settings_form.focus_prev(),
                _ => {}
            }
            UpdateResult::none()
        }

        Message::FormInput(c) => {
            match state.panel {
                Panel::RouterInfo => state.router_info.insert_char(c),
                Panel::Settings => state.settings_form.insert_char(c),
                _ => {}
            }
            UpdateResult::none()
        }

        Message::FormBackspace => {
            match state.panel {
                Panel::RouterInfo => state.router_info.backspace(),
                Panel::Settings => state.settings_form.backspace(),
                _ => {}
            }
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scan
// ─────────────────────────────────────────────────────────────────────────────

fn handle_request_scan(state: &mut AppState) -> UpdateResult {
    state.registry.clear();
    match state.scans.request() {
        ScanDecision::Issue(scan_id) => {
            state.report_info("Scanning for devices...");
            UpdateResult::action(UpdateAction::ScanDevices { scan_id })
        }
        ScanDecision::Queued => {
            debug!("scan queued behind the one in flight");
            UpdateResult::none()
        }
    }
}

fn handle_scan_finished(
    state: &mut AppState,
    scan_id: ScanId,
    result: Result<Vec<DeviceRecord>, String>,
) -> UpdateResult {
    match result {
        Ok(records) => {
            let count = records.len();
            state.registry.replace(records);
            state.report_info(format!("Found {count} device(s)"));
        }
        Err(e) => {
            warn!("scan {} failed: {}", scan_id, e);
            state.registry.clear();
            state.report_error(format!("Scan failed: {e}"));
        }
    }

    match state.scans.complete(scan_id) {
        Some(next) => {
            state.registry.clear();
            UpdateResult::action(UpdateAction::ScanDevices { scan_id: next })
        }
        None => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compare
// ─────────────────────────────────────────────────────────────────────────────

fn fire(call: CompareCall, transition: Option<Transition>) -> UpdateResult {
    UpdateResult::action(UpdateAction::FireCompare { call, transition })
}

/// Start and Stop would only fail against a dead host, and failing them
/// leaves nothing to roll back to.
fn refuse_while_down(state: &mut AppState, call: CompareCall) -> bool {
    if state.bridge.is_down() {
        state.report_error(format!("Cannot {}: host unavailable", call.label()));
        true
    } else {
        false
    }
}

fn handle_compare_call_finished(
    state: &mut AppState,
    call: CompareCall,
    transition: Option<Transition>,
    result: Result<(), String>,
) -> UpdateResult {
    match result {
        Ok(()) => {
            let msg = match call {
                CompareCall::Start => "Compare started",
                CompareCall::Stop => "Compare stopped",
                CompareCall::Save => "Log saved",
            };
            state.report_info(msg);
        }
        Err(e) => {
            warn!("{} call failed: {}", call.label(), e);
            if let Some(transition) = transition {
                if !state.compare.rollback(transition) {
                    debug!(
                        "{} failed after the session moved on, keeping {}",
                        call.label(),
                        state.compare.phase()
                    );
                }
            }
            state.report_error(format!("{} failed: {e}", capitalize(call.label())));
        }
    }
    UpdateResult::none()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pulls
// ─────────────────────────────────────────────────────────────────────────────

fn pull_value(state: &AppState, request: PullRequest) -> Value {
    match request {
        PullRequest::Output => Value::String(state.compare.output().to_string()),
        PullRequest::RouterInfo => {
            serde_json::to_value(state.router_info.info()).unwrap_or(Value::Null)
        }
        PullRequest::ScanInterval => Value::from(state.settings_form.scan_interval()),
    }
}
