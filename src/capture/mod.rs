//! Foreground selection capture
//!
//! Retrieves the text selected in whatever application has focus by
//! synthesizing the copy shortcut and reading the clipboard, while keeping
//! the user's clipboard content intact.

mod clipboard;
mod inject;
mod selection;
mod worker;

pub use clipboard::{ClipboardBackend, ClipboardSnapshot, SystemClipboard};
pub use inject::{copy_modifier, KeyInjector, RdevInjector};
pub use selection::{text_preview, CaptureTiming, SelectionCapture};
pub use worker::CaptureWorker;

/// Errors from clipboard access or key injection
///
/// [`SelectionCapture::capture`] never surfaces these; they are logged and
/// the capture degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("clipboard access failed: {0}")]
    Clipboard(String),

    #[error("key injection failed: {0}")]
    Injection(String),

    #[error("failed to spawn capture thread: {0}")]
    Worker(String),
}
