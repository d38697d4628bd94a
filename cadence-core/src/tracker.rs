//! # Cadence Tracker Module
//!
//! The Idle/Recording state machine driven by external key events. The
//! tracker owns the current session, debounces held keys, and exposes
//! its output as plain data (`TapReadout`, the sample log) for a display
//! collaborator to render; it never touches presentation state itself.

use std::collections::HashSet;
use std::time::Instant;

use crate::TapReadout;
use crate::config::TrackerSettings;
use crate::session::{Sample, Session, TAPS_PER_BEAT};

/// Recording lifecycle. Stop is always reachable from `Recording` and
/// start is always reachable from `Idle`; there are no other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Recording,
}

#[derive(Debug)]
pub struct CadenceTracker {
    phase: Phase,
    /// Keys currently held down. A second press of a held key before its
    /// release is debounce noise, not a new tap.
    held: HashSet<u32>,
    /// Set when a session ends by reaching its tap target: key presses
    /// must not open a fresh session until `begin_session` runs again.
    await_begin: bool,
    /// The current or most recently finished session. Kept after
    /// `end_session` so the sample log stays inspectable and exportable.
    session: Option<Session>,
}

impl CadenceTracker {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            held: HashSet::new(),
            await_begin: false,
            session: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.phase == Phase::Recording
    }

    /// Starts a fresh session. No-op while one is already recording.
    ///
    /// The settings are sampled here (window normalized to an even
    /// value) and held fixed until the session ends. The held-key set is
    /// reset so a key left over from a previous session cannot block its
    /// first tap.
    pub fn begin_session(&mut self, settings: &TrackerSettings, now: Instant) {
        if self.phase == Phase::Recording {
            return;
        }
        self.session = Some(Session::new(now, &settings.normalized()));
        self.held.clear();
        self.await_begin = false;
        self.phase = Phase::Recording;
    }

    /// Feeds one key-down event into the tracker.
    ///
    /// Auto-repeat signals are ignored outright. A qualifying press
    /// while idle begins a session (unless a finished target run is
    /// waiting for an explicit restart) and counts as its first tap.
    pub fn key_down(&mut self, key: u32, is_repeat: bool, settings: &TrackerSettings, now: Instant) {
        if is_repeat {
            return;
        }
        if self.phase == Phase::Idle {
            if self.await_begin {
                return;
            }
            self.begin_session(settings, now);
        }
        if !self.held.insert(key) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.record_tap(now, key);
        if session.target_reached() {
            self.phase = Phase::Idle;
            self.await_begin = true;
        }
    }

    /// Feeds one key-up event into the tracker, re-enabling future
    /// presses of that key. No-op outside `Recording`.
    pub fn key_up(&mut self, key: u32) {
        if self.phase != Phase::Recording {
            return;
        }
        self.held.remove(&key);
    }

    /// Explicit stop request (the cancel key). Ends any active session
    /// and drops all held-key state, including the restart latch.
    pub fn cancel(&mut self) {
        self.held.clear();
        self.await_begin = false;
        self.end_session();
    }

    /// Stops recording. Safe to call from either state; the sample log
    /// stays available until the next `begin_session`.
    pub fn end_session(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Current reading for the display collaborator.
    pub fn readout(&self) -> TapReadout {
        match &self.session {
            Some(session) => {
                let last = session.last_sample();
                TapReadout {
                    taps_per_second: last.map(|s| s.bpm / (60.0 / TAPS_PER_BEAT)),
                    bpm: last.map(|s| s.bpm),
                    tap_count: session.tap_count(),
                }
            }
            None => TapReadout {
                taps_per_second: None,
                bpm: None,
                tap_count: 0,
            },
        }
    }

    /// Full-resolution sample log of the current or last session.
    pub fn samples(&self) -> &[Sample] {
        self.session.as_ref().map(Session::samples).unwrap_or(&[])
    }
}

impl Default for CadenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
