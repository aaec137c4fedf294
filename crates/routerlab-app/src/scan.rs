//! Scan controller
//!
//! Decides when a requested scan is actually sent to the host. Under
//! [`ScanPolicy::Serialize`] at most one scan is in flight and further
//! requests coalesce into a single queued follow-up; under
//! [`ScanPolicy::Race`] every request goes out at once and replies are
//! applied in arrival order.

use serde::{Deserialize, Serialize};

/// What to do with a scan request that arrives while another is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPolicy {
    /// Queue it behind the in-flight scan (at most one queued).
    #[default]
    Serialize,
    /// Send it immediately; the last reply to arrive wins.
    Race,
}

impl std::fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPolicy::Serialize => write!(f, "serialize"),
            ScanPolicy::Race => write!(f, "race"),
        }
    }
}

/// Identifies one scan sent to the host.
pub type ScanId = u64;

/// Outcome of [`ScanController::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// Send this scan now.
    Issue(ScanId),
    /// A scan is already in flight; this request will run after it.
    Queued,
}

#[derive(Debug, Clone, Default)]
pub struct ScanController {
    policy: ScanPolicy,
    in_flight: Vec<ScanId>,
    queued: bool,
    next_id: ScanId,
    completed: u64,
}

impl ScanController {
    pub fn new(policy: ScanPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Register a scan request.
    pub fn request(&mut self) -> ScanDecision {
        if self.policy == ScanPolicy::Serialize && !self.in_flight.is_empty() {
            self.queued = true;
            return ScanDecision::Queued;
        }
        ScanDecision::Issue(self.issue())
    }

    /// Record that the reply to `scan_id` arrived (successfully or not).
    ///
    /// Returns the id of a queued scan that should be sent now, if any.
    /// Replies for unknown ids are ignored.
    pub fn complete(&mut self, scan_id: ScanId) -> Option<ScanId> {
        let Some(pos) = self.in_flight.iter().position(|id| *id == scan_id) else {
            return None;
        };
        self.in_flight.remove(pos);
        self.completed += 1;

        if self.queued && self.in_flight.is_empty() {
            self.queued = false;
            return Some(self.issue());
        }
        None
    }

    pub fn is_scanning(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn has_queued(&self) -> bool {
        self.queued
    }

    /// Number of scans whose reply has been handled.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    fn issue(&mut self) -> ScanId {
        self.next_id += 1;
        self.in_flight.push(self.next_id);
        self.next_id
    }
}
