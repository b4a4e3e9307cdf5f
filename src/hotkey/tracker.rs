//! Pressed-key state tracking

use rdev::Key;

use super::combo::KeySet;
use super::keys::normalize;

/// Tracks which canonical keys are currently held down
#[derive(Debug, Default)]
pub struct KeyStateTracker {
    pressed: KeySet,
}

impl KeyStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. OS key-repeat presses are idempotent.
    ///
    /// Returns whether the set changed.
    pub fn on_press(&mut self, key: Key) -> bool {
        self.pressed.insert(normalize(key))
    }

    /// Record a key release. Releasing a key that is not held is a no-op.
    ///
    /// Returns whether the set changed.
    pub fn on_release(&mut self, key: Key) -> bool {
        self.pressed.remove(&normalize(key))
    }

    /// Keys currently held
    pub fn current_set(&self) -> &KeySet {
        &self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut tracker = KeyStateTracker::new();
        assert!(tracker.on_press(Key::ControlLeft));
        assert!(tracker.on_press(Key::KeyQ));
        assert_eq!(*tracker.current_set(), KeySet::parse("ctrl+q"));

        assert!(tracker.on_release(Key::KeyQ));
        assert_eq!(*tracker.current_set(), KeySet::parse("ctrl"));
    }

    #[test]
    fn test_repeat_press_is_idempotent() {
        let mut tracker = KeyStateTracker::new();
        tracker.on_press(Key::KeyA);
        assert!(!tracker.on_press(Key::KeyA));
        assert_eq!(tracker.current_set().len(), 1);
    }

    #[test]
    fn test_release_of_absent_key_is_noop() {
        let mut tracker = KeyStateTracker::new();
        tracker.on_press(Key::ShiftLeft);
        let before = tracker.current_set().clone();

        assert!(!tracker.on_release(Key::KeyZ));
        assert_eq!(*tracker.current_set(), before);
    }

    #[test]
    fn test_left_and_right_share_a_slot() {
        let mut tracker = KeyStateTracker::new();
        tracker.on_press(Key::ControlLeft);
        tracker.on_press(Key::ControlRight);
        assert_eq!(tracker.current_set().len(), 1);

        // Releasing either side clears the folded token
        tracker.on_release(Key::ControlRight);
        assert!(tracker.current_set().is_empty());
    }
}
