//! Selected-text capture through the clipboard
//!
//! Saves the clipboard, clears it, sends the copy shortcut, reads whatever
//! the foreground application copied, then puts the saved payload back.
//! The restore runs from a drop guard, so every exit path leaves the
//! clipboard as it was found.

use std::ops::{Deref, DerefMut};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::clipboard::{ClipboardBackend, ClipboardSnapshot, SystemClipboard};
use super::inject::{KeyInjector, RdevInjector};
use super::CaptureError;
use crate::config::CaptureConfig;

/// Delays used by a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTiming {
    /// After clearing, before the copy shortcut
    pub clear_delay: Duration,
    /// After the copy shortcut, before reading
    pub copy_delay: Duration,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            clear_delay: Duration::from_millis(50),
            copy_delay: Duration::from_millis(100),
        }
    }
}

impl From<&CaptureConfig> for CaptureTiming {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            clear_delay: Duration::from_millis(config.clear_delay_ms),
            copy_delay: Duration::from_millis(config.copy_delay_ms),
        }
    }
}

/// Captures the foreground selection via a synthesized copy
pub struct SelectionCapture<C, K> {
    clipboard: C,
    injector: K,
    timing: CaptureTiming,
}

impl SelectionCapture<SystemClipboard, RdevInjector> {
    /// Capture backed by the system clipboard and `rdev` injection
    pub fn system(config: &CaptureConfig) -> Result<Self, CaptureError> {
        Ok(Self::new(
            SystemClipboard::new()?,
            RdevInjector::new(Duration::from_millis(config.key_gap_ms)),
            CaptureTiming::from(config),
        ))
    }
}

impl<C: ClipboardBackend, K: KeyInjector> SelectionCapture<C, K> {
    pub fn new(clipboard: C, injector: K, timing: CaptureTiming) -> Self {
        Self {
            clipboard,
            injector,
            timing,
        }
    }

    /// Return the currently selected text, or an empty string
    ///
    /// Blocks for roughly the configured delays. Never fails: clipboard and
    /// injection errors are logged and yield an empty result. Do not call
    /// from the listener thread.
    pub fn capture(&mut self) -> String {
        let snapshot = match self.clipboard.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Without a snapshot the clipboard cannot be restored, so leave it alone
                warn!(error = %e, "could not save clipboard, skipping capture");
                return String::new();
            }
        };

        let mut guard = RestoreGuard {
            clipboard: &mut self.clipboard,
            snapshot,
        };

        match copy_selection(&mut *guard, &mut self.injector, self.timing) {
            Ok(text) => {
                info!(
                    text_len = text.len(),
                    text_preview = %text_preview(&text),
                    "selection captured"
                );
                text
            }
            Err(e) => {
                warn!(error = %e, "selection capture failed");
                String::new()
            }
        }
    }
}

fn copy_selection<C: ClipboardBackend, K: KeyInjector>(
    clipboard: &mut C,
    injector: &mut K,
    timing: CaptureTiming,
) -> Result<String, CaptureError> {
    // A stale value must not be mistaken for a fresh selection
    clipboard.write_text("")?;
    thread::sleep(timing.clear_delay);

    injector.send_copy()?;
    thread::sleep(timing.copy_delay);

    Ok(clipboard.read_text()?.unwrap_or_default())
}

/// Restores the saved clipboard payload when dropped
struct RestoreGuard<'a, C: ClipboardBackend> {
    clipboard: &'a mut C,
    snapshot: ClipboardSnapshot,
}

impl<C: ClipboardBackend> Deref for RestoreGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.clipboard
    }
}

impl<C: ClipboardBackend> DerefMut for RestoreGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.clipboard
    }
}

impl<C: ClipboardBackend> Drop for RestoreGuard<'_, C> {
    fn drop(&mut self) {
        match self.clipboard.restore(&self.snapshot) {
            Ok(()) => debug!("clipboard restored"),
            Err(e) => error!(error = %e, "failed to restore clipboard"),
        }
    }
}

/// Truncated preview of captured text for logs
///
/// Texts over 50 bytes are cut to at most 47 bytes on a char boundary
/// and suffixed with "...".
#[must_use]
pub fn text_preview(text: &str) -> String {
    if text.len() <= 50 {
        return text.to_owned();
    }
    let mut end = 47;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
