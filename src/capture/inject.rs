//! Synthesized copy keystroke

use std::thread;
use std::time::Duration;

use rdev::{EventType, Key};
use tracing::debug;

use super::CaptureError;

/// Sends the platform copy shortcut to the foreground application
pub trait KeyInjector {
    fn send_copy(&mut self) -> Result<(), CaptureError>;
}

/// Modifier that pairs with `C` for copy on this platform
pub fn copy_modifier() -> Key {
    if cfg!(target_os = "macos") {
        Key::MetaLeft
    } else {
        Key::ControlLeft
    }
}

/// Injects keystrokes through `rdev::simulate`
///
/// Some platforms drop synthesized events that arrive back to back, so a
/// short gap follows each one.
pub struct RdevInjector {
    modifier: Key,
    gap: Duration,
}

impl RdevInjector {
    pub fn new(gap: Duration) -> Self {
        Self {
            modifier: copy_modifier(),
            gap,
        }
    }

    fn send(&self, event_type: &EventType) -> Result<(), CaptureError> {
        let result = rdev::simulate(event_type)
            .map_err(|e| CaptureError::Injection(format!("{event_type:?}: {e:?}")));
        thread::sleep(self.gap);
        result
    }
}

impl KeyInjector for RdevInjector {
    fn send_copy(&mut self) -> Result<(), CaptureError> {
        debug!(modifier = ?self.modifier, "sending copy shortcut");

        self.send(&EventType::KeyPress(self.modifier))?;
        let pressed = self.send(&EventType::KeyPress(Key::KeyC));
        let released = self.send(&EventType::KeyRelease(Key::KeyC));
        // Always let go of the modifier, even if C failed
        let modifier_released = self.send(&EventType::KeyRelease(self.modifier));

        pressed.and(released).and(modifier_released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_modifier_matches_platform() {
        if cfg!(target_os = "macos") {
            assert_eq!(copy_modifier(), Key::MetaLeft);
        } else {
            assert_eq!(copy_modifier(), Key::ControlLeft);
        }
    }

    #[test]
    #[ignore = "injects real keystrokes into the focused window"]
    fn test_send_copy() {
        let mut injector = RdevInjector::new(Duration::from_millis(10));
        assert!(injector.send_copy().is_ok());
    }
}
