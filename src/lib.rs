//! zdtrans-daemon: global hotkeys and selection capture for the zdtrans translator
//!
//! - Global key listening via `rdev`, normalized into canonical key sets
//! - Edge-triggered matching of multi-key bindings to named actions
//! - Interactive combo recording for defining new bindings
//! - Capture of the foreground selection through a synthesized copy,
//!   leaving the user's clipboard untouched

/// Selection capture through the clipboard
pub mod capture;
/// Configuration management
pub mod config;
/// Events sent from the listener to the consumer
pub mod events;
/// Hotkey engine and global listener
pub mod hotkey;
/// Shutdown signal handling
pub mod lifecycle;

pub use capture::SelectionCapture;
pub use config::Config;
pub use events::EngineEvent;
pub use hotkey::{HotkeyEngine, HotkeyListener, KeySet};
