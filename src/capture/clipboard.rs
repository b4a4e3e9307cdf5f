//! Clipboard access for selection capture

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use tracing::debug;

use super::CaptureError;

/// Clipboard payload saved before a capture and put back afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardSnapshot {
    /// Nothing readable on the clipboard
    Empty,
    Text(String),
    /// RGBA pixels, 4 bytes per pixel
    Image {
        width: usize,
        height: usize,
        bytes: Vec<u8>,
    },
}

/// The shared clipboard as seen by [`SelectionCapture`](super::SelectionCapture)
pub trait ClipboardBackend {
    /// Read text content. `Ok(None)` means no text is available.
    fn read_text(&mut self) -> Result<Option<String>, CaptureError>;

    fn write_text(&mut self, text: &str) -> Result<(), CaptureError>;

    /// Save whatever the clipboard currently holds
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, CaptureError>;

    /// Put a saved payload back
    fn restore(&mut self, snapshot: &ClipboardSnapshot) -> Result<(), CaptureError>;
}

/// System clipboard via `arboard`
///
/// The instance must outlive every capture that restores through it: on X11
/// the clipboard contents are served by the owning instance and vanish when
/// it is dropped. [`CaptureWorker`](super::CaptureWorker) keeps one open for
/// the daemon's lifetime.
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, CaptureError> {
        let inner = Clipboard::new().map_err(clipboard_error)?;
        Ok(Self { inner })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, CaptureError> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(clipboard_error(e)),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), CaptureError> {
        self.inner.set_text(text).map_err(clipboard_error)
    }

    fn snapshot(&mut self) -> Result<ClipboardSnapshot, CaptureError> {
        if let Some(text) = self.read_text()? {
            return Ok(ClipboardSnapshot::Text(text));
        }

        match self.inner.get_image() {
            Ok(image) => {
                debug!(width = image.width, height = image.height, "clipboard holds an image");
                Ok(ClipboardSnapshot::Image {
                    width: image.width,
                    height: image.height,
                    bytes: image.bytes.into_owned(),
                })
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(ClipboardSnapshot::Empty),
            Err(e) => Err(clipboard_error(e)),
        }
    }

    fn restore(&mut self, snapshot: &ClipboardSnapshot) -> Result<(), CaptureError> {
        match snapshot {
            ClipboardSnapshot::Empty => self.inner.clear().map_err(clipboard_error),
            ClipboardSnapshot::Text(text) => self.write_text(text),
            ClipboardSnapshot::Image {
                width,
                height,
                bytes,
            } => self
                .inner
                .set_image(ImageData {
                    width: *width,
                    height: *height,
                    bytes: Cow::Borrowed(bytes.as_slice()),
                })
                .map_err(clipboard_error),
        }
    }
}

fn clipboard_error(e: arboard::Error) -> CaptureError {
    CaptureError::Clipboard(e.to_string())
}
