//! Global hotkey engine
//!
//! Raw key events from the OS hook are normalized into canonical tokens,
//! tracked as a held-key set, and either matched against the registered
//! bindings or fed to the combo recorder.

mod combo;
mod engine;
mod keys;
mod listener;
mod matcher;
mod recorder;
mod tracker;

pub use combo::KeySet;
pub use engine::{HotkeyEngine, RawKeyEvent};
pub use keys::{normalize, CanonicalKey, MODIFIER_ORDER};
pub use listener::{report_degraded, HotkeyError, HotkeyListener};
pub use matcher::{ActionTriggered, Edge, HotkeyBinding, HotkeyMatcher};
pub use recorder::{ComboRecorder, RecorderEvent, RecorderState};
pub use tracker::KeyStateTracker;
