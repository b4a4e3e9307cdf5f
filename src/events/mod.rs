//! Events delivered from the listener thread to the consumer
//!
//! Carried over a bounded channel in the order the keystrokes happened.

use serde::{Deserialize, Serialize};

use crate::hotkey::{ActionTriggered, RecorderEvent};

/// Notifications emitted by the hotkey engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A registered combination was pressed
    ActionTriggered {
        /// Name of the bound action, e.g. "translate"
        action: String,
    },

    /// Keys accumulated so far while recording
    ComboPreview {
        /// Canonical combo string
        combo: String,
    },

    /// Recorded candidate had no modifier; recording continues
    ComboRejected,

    /// Recording finished with a combo
    ComboRecorded {
        /// Canonical combo string, e.g. "Ctrl+Shift+Q"
        combo: String,
    },
}

impl From<ActionTriggered> for EngineEvent {
    fn from(event: ActionTriggered) -> Self {
        EngineEvent::ActionTriggered {
            action: event.action,
        }
    }
}

impl From<RecorderEvent> for EngineEvent {
    fn from(event: RecorderEvent) -> Self {
        match event {
            RecorderEvent::Preview(combo) => EngineEvent::ComboPreview { combo },
            RecorderEvent::NeedsModifier => EngineEvent::ComboRejected,
            RecorderEvent::Finalized(combo) => EngineEvent::ComboRecorded { combo },
        }
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::ActionTriggered { action } => write!(f, "ACTION_TRIGGERED ({})", action),
            EngineEvent::ComboPreview { combo } => write!(f, "COMBO_PREVIEW ({})", combo),
            EngineEvent::ComboRejected => write!(f, "COMBO_REJECTED (needs a modifier)"),
            EngineEvent::ComboRecorded { combo } => write!(f, "COMBO_RECORDED ({})", combo),
        }
    }
}
