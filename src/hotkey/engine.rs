//! Routes raw key events to the matcher or the recorder
//!
//! The listener thread calls [`HotkeyEngine::handle`] for every keystroke.
//! Tracker, matcher and recorder live behind one lock, so switching into or
//! out of recording is atomic with respect to event delivery: each event is
//! seen by exactly one of matcher or recorder.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rdev::Key;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use super::combo::KeySet;
use super::matcher::{Edge, HotkeyBinding, HotkeyMatcher};
use super::recorder::{ComboRecorder, RecorderEvent, RecorderState};
use super::tracker::KeyStateTracker;
use crate::events::EngineEvent;

/// A raw keyboard transition from the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKeyEvent {
    Press(Key),
    Release(Key),
}

#[derive(Debug, Default)]
struct Dispatcher {
    tracker: KeyStateTracker,
    matcher: HotkeyMatcher,
    recorder: ComboRecorder,
}

impl Dispatcher {
    fn dispatch(&mut self, event: RawKeyEvent) -> Option<EngineEvent> {
        let (key, edge) = match event {
            RawKeyEvent::Press(key) => {
                self.tracker.on_press(key);
                (key, Edge::Pressed)
            }
            RawKeyEvent::Release(key) => {
                self.tracker.on_release(key);
                (key, Edge::Released)
            }
        };

        if self.recorder.is_recording() {
            let step = match edge {
                Edge::Pressed => self.recorder.on_press(key),
                Edge::Released => self.recorder.on_release(key),
            };
            if let Some(RecorderEvent::Finalized(_)) = &step {
                self.matcher.resync(self.tracker.current_set());
            }
            return step.map(EngineEvent::from);
        }

        self.matcher
            .on_state_changed(self.tracker.current_set(), edge)
            .map(EngineEvent::from)
    }
}

/// Shared handle to the hotkey engine
///
/// Cheap to clone. One clone is moved into the listener thread; others stay
/// with the consumer for binding updates and recording control.
#[derive(Debug, Clone)]
pub struct HotkeyEngine {
    inner: Arc<Mutex<Dispatcher>>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl HotkeyEngine {
    /// Create an engine with an initial binding table
    pub fn new(bindings: HashMap<String, KeySet>, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        let dispatcher = Dispatcher {
            matcher: HotkeyMatcher::new(bindings),
            ..Dispatcher::default()
        };
        Self {
            inner: Arc::new(Mutex::new(dispatcher)),
            event_tx,
        }
    }

    /// Feed one raw key event. Called on the listener thread.
    pub fn handle(&self, event: RawKeyEvent) {
        let emitted = self.lock().dispatch(event);
        if let Some(event) = emitted {
            self.emit(event);
        }
    }

    /// Replace the binding table wholesale
    pub fn update_bindings(&self, bindings: HashMap<String, KeySet>) {
        let mut inner = self.lock();
        inner.matcher.update_bindings(bindings);
        let Dispatcher { tracker, matcher, .. } = &mut *inner;
        matcher.resync(tracker.current_set());
    }

    /// Route subsequent key events to the recorder
    pub fn start_recording(&self) {
        self.lock().recorder.start();
    }

    /// Stop recording without a result and resume hotkey matching
    pub fn cancel_recording(&self) {
        let mut inner = self.lock();
        inner.recorder.cancel();
        let Dispatcher { tracker, matcher, .. } = &mut *inner;
        matcher.resync(tracker.current_set());
    }

    pub fn is_recording(&self) -> bool {
        self.lock().recorder.is_recording()
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.lock().recorder.state().clone()
    }

    /// Snapshot of the keys currently held
    pub fn pressed_keys(&self) -> KeySet {
        self.lock().tracker.current_set().clone()
    }

    /// Snapshot of the binding table, most specific first
    pub fn bindings(&self) -> Vec<HotkeyBinding> {
        self.lock().matcher.bindings().to_vec()
    }

    fn lock(&self) -> MutexGuard<'_, Dispatcher> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EngineEvent) {
        // Never block the listener thread on a slow consumer
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(%event, "event channel full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                debug!(%event, "event channel closed, dropping event");
            }
        }
    }
}
