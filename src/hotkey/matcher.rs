//! Edge-triggered hotkey matching
//!
//! Bindings are kept sorted most-specific first, so a longer combination
//! such as Ctrl+Shift+Q wins over Ctrl+Q while the user presses toward it.
//! An action fires once when the held set first equals its binding and
//! re-arms as soon as the held set changes away from it.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::combo::KeySet;

/// An action name paired with the exact key set that triggers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub action: String,
    pub keys: KeySet,
}

/// Which way the held set just changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

/// Emitted when a binding is entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTriggered {
    pub action: String,
}

/// Matches held key sets against the binding table
#[derive(Debug, Default)]
pub struct HotkeyMatcher {
    /// Sorted by key count descending, then action name
    bindings: Vec<HotkeyBinding>,
    /// Action whose binding currently equals the held set
    match_state: Option<String>,
}

impl HotkeyMatcher {
    pub fn new(bindings: HashMap<String, KeySet>) -> Self {
        let mut matcher = Self::default();
        matcher.update_bindings(bindings);
        matcher
    }

    /// Replace the whole binding table
    ///
    /// The new table is built before it is swapped in, so no evaluation
    /// ever sees a partial update. Empty key sets disable their action.
    pub fn update_bindings(&mut self, bindings: HashMap<String, KeySet>) {
        self.bindings = build_table(bindings);
        info!(
            bindings = %describe(&self.bindings),
            "hotkey bindings updated"
        );
    }

    /// Current binding table, most specific first
    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }

    /// Action currently matched, if any
    pub fn match_state(&self) -> Option<&str> {
        self.match_state.as_deref()
    }

    /// Evaluate the held set after a key transition
    ///
    /// Only a press edge can fire; a release edge merely clears the match
    /// state when the held set no longer equals the matched binding.
    pub fn on_state_changed(&mut self, pressed: &KeySet, edge: Edge) -> Option<ActionTriggered> {
        let Some(binding) = find_exact(&self.bindings, pressed) else {
            if let Some(previous) = self.match_state.take() {
                debug!(action = %previous, "hotkey match cleared");
            }
            return None;
        };

        if self.match_state.as_deref() == Some(binding.action.as_str()) {
            return None;
        }

        if edge == Edge::Released {
            // Falling back into a binding from a superset is not a new press
            self.match_state = None;
            return None;
        }

        info!(action = %binding.action, keys = %binding.keys, "hotkey triggered");
        self.match_state = Some(binding.action.clone());
        Some(ActionTriggered {
            action: binding.action.clone(),
        })
    }

    /// Set the match state to whatever the held set equals, without firing
    pub fn resync(&mut self, pressed: &KeySet) {
        self.match_state = find_exact(&self.bindings, pressed).map(|b| b.action.clone());
    }
}

fn find_exact<'a>(bindings: &'a [HotkeyBinding], pressed: &KeySet) -> Option<&'a HotkeyBinding> {
    if pressed.is_empty() {
        return None;
    }
    bindings.iter().find(|binding| binding.keys == *pressed)
}

fn build_table(bindings: HashMap<String, KeySet>) -> Vec<HotkeyBinding> {
    let mut table: Vec<HotkeyBinding> = bindings
        .into_iter()
        .filter_map(|(action, keys)| {
            if keys.is_empty() {
                warn!(%action, "empty hotkey binding, action disabled");
                None
            } else {
                Some(HotkeyBinding { action, keys })
            }
        })
        .collect();

    table.sort_by(|a, b| {
        b.keys
            .len()
            .cmp(&a.keys.len())
            .then_with(|| a.action.cmp(&b.action))
    });

    for (i, binding) in table.iter().enumerate() {
        if let Some(shadowed) = table[i + 1..].iter().find(|other| other.keys == binding.keys) {
            warn!(
                winner = %binding.action,
                shadowed = %shadowed.action,
                keys = %binding.keys,
                "conflicting hotkey bindings"
            );
        }
    }

    table
}

fn describe(bindings: &[HotkeyBinding]) -> String {
    bindings
        .iter()
        .map(|b| format!("{}={}", b.action, b.keys))
        .collect::<Vec<_>>()
        .join(", ")
}
