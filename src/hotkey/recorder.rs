//! Interactive combo recording
//!
//! While recording, raw key events go here instead of to the matcher. Each
//! press extends the candidate combo; the first release finalizes it if a
//! modifier is held, otherwise the candidate is rejected and recording
//! continues.

use rdev::Key;
use tracing::{debug, info};

use super::combo::KeySet;
use super::keys::normalize;

/// Recorder lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// Not recording
    #[default]
    Idle,
    /// Accumulating keys
    Recording,
    /// A combo was accepted
    Finalized(String),
}

/// Output of a single recorder step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// Keys accumulated so far, in canonical display form
    Preview(String),
    /// Candidate had no modifier and was discarded; recording continues
    NeedsModifier,
    /// Canonical combo string, recording finished
    Finalized(String),
}

/// Accumulates pressed keys into a combo string
#[derive(Debug, Default)]
pub struct ComboRecorder {
    state: RecorderState,
    accumulated: KeySet,
}

impl ComboRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Enter Recording with an empty accumulator
    pub fn start(&mut self) {
        self.accumulated.clear();
        self.state = RecorderState::Recording;
        info!("combo recording started");
    }

    /// Abandon the session without producing a result
    pub fn cancel(&mut self) {
        if self.is_recording() {
            info!("combo recording cancelled");
        }
        self.accumulated.clear();
        self.state = RecorderState::Idle;
    }

    pub fn on_press(&mut self, key: Key) -> Option<RecorderEvent> {
        if !self.is_recording() {
            return None;
        }

        self.accumulated.insert(normalize(key));
        let preview = self.accumulated.to_string();
        debug!(%preview, "combo preview");
        Some(RecorderEvent::Preview(preview))
    }

    pub fn on_release(&mut self, _key: Key) -> Option<RecorderEvent> {
        // Releases of keys held before recording began arrive with nothing accumulated
        if !self.is_recording() || self.accumulated.is_empty() {
            return None;
        }

        if !self.accumulated.has_modifier() {
            debug!(rejected = %self.accumulated, "combo needs a modifier");
            self.accumulated.clear();
            return Some(RecorderEvent::NeedsModifier);
        }

        let combo = self.accumulated.to_string();
        self.accumulated.clear();
        self.state = RecorderState::Finalized(combo.clone());
        info!(%combo, "combo recorded");
        Some(RecorderEvent::Finalized(combo))
    }
}
