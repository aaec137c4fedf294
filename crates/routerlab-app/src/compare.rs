//! Compare session state machine
//!
//! | From    | Action | To      | Effect                              |
//! |---------|--------|---------|-------------------------------------|
//! | idle    | Start  | running | clear transcript, disable Save      |
//! | stopped | Start  | running | clear transcript, disable Save      |
//! | running | Stop   | stopped | enable Save                         |
//! | stopped | Save   | stopped | none                                |
//!
//! Anything else is rejected and must not reach the host. Transitions are
//! applied before the matching host call is sent; if that call fails the
//! caller may undo the transition with [`CompareSession::rollback`].

use routerlab_core::ComparePhase;

use crate::log_buffer::LogBuffer;

/// A phase change applied optimistically, ahead of the host's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ComparePhase,
    pub to: ComparePhase,
    /// Session sequence number this transition produced
    pub seq: u64,
}

/// Which compare controls accept a press right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    pub save: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CompareSession {
    phase: ComparePhase,
    can_save: bool,
    log: LogBuffer,
    /// Bumped by every applied start, stop and rollback
    seq: u64,
}

impl CompareSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ComparePhase {
        self.phase
    }

    pub fn can_save(&self) -> bool {
        self.can_save
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn controls(&self) -> Controls {
        Controls {
            start: self.phase != ComparePhase::Running,
            stop: self.phase == ComparePhase::Running,
            save: self.can_save,
        }
    }

    /// Idle/Stopped → Running. Clears the transcript.
    ///
    /// Returns `None`, changing nothing, while already running.
    pub fn start(&mut self) -> Option<Transition> {
        if self.phase == ComparePhase::Running {
            return None;
        }
        self.seq += 1;
        let transition = Transition {
            from: self.phase,
            to: ComparePhase::Running,
            seq: self.seq,
        };
        self.phase = ComparePhase::Running;
        self.can_save = false;
        self.log.clear();
        Some(transition)
    }

    /// Running → Stopped. Enables Save.
    ///
    /// Returns `None`, changing nothing, unless running.
    pub fn stop(&mut self) -> Option<Transition> {
        if self.phase != ComparePhase::Running {
            return None;
        }
        self.seq += 1;
        self.phase = ComparePhase::Stopped;
        self.can_save = true;
        Some(Transition {
            from: ComparePhase::Running,
            to: ComparePhase::Stopped,
            seq: self.seq,
        })
    }

    /// Undo `transition` if it is still the latest one applied.
    ///
    /// A transition that has since been superseded is left alone, even when
    /// a later transition landed in the same phase (Start, Stop, Start). The
    /// transcript cleared by a Start is not restored.
    pub fn rollback(&mut self, transition: Transition) -> bool {
        if transition.seq != self.seq || self.phase != transition.to {
            return false;
        }
        self.seq += 1;
        self.phase = transition.from;
        self.can_save = transition.from == ComparePhase::Stopped;
        true
    }

    /// Append host output. Accepted in every phase.
    pub fn append_output(&mut self, chunk: impl Into<String>) {
        self.log.append(chunk);
    }

    /// The transcript as the host pulls it.
    pub fn output(&self) -> &str {
        self.log.snapshot()
    }
}
