//! Configuration loading and management
//!
//! Reads the `hotkey` and `capture` sections of the translator's
//! `config.json`; every other section belongs to other components and is
//! ignored here.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hotkey::KeySet;

const CONFIG_FILE: &str = "config.json";
const CONFIG_DIR: &str = ".zdtrans";

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Action name -> combo string, e.g. `"translate": "Ctrl+Q"`
    pub hotkey: BTreeMap<String, String>,

    /// Selection capture timings
    pub capture: CaptureConfig,

    /// Capacity of the listener -> consumer event channel
    pub event_buffer: usize,
}

/// Delays for selection capture, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub clear_delay_ms: u64,
    pub copy_delay_ms: u64,
    /// Pause after each synthesized key event
    pub key_gap_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            clear_delay_ms: 50,
            copy_delay_ms: 100,
            key_gap_ms: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: default_hotkeys(),
            capture: CaptureConfig::default(),
            event_buffer: 32,
        }
    }
}

fn default_hotkeys() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("translate".to_owned(), "Ctrl+Q".to_owned()),
        ("polish".to_owned(), "Ctrl+Shift+Q".to_owned()),
    ])
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise `./config.json` is tried, then
    /// `~/.zdtrans/config.json`, falling back to defaults when neither exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::discover() {
                Some(path) => path,
                None => {
                    info!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse a JSON document, filling gaps with defaults
    ///
    /// A partial `hotkey` section keeps the default combo for any action it
    /// leaves out. An empty combo string disables that action.
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(contents)?;
        for (action, combo) in default_hotkeys() {
            config.hotkey.entry(action).or_insert(combo);
        }
        if config.event_buffer == 0 {
            anyhow::bail!("event_buffer must be at least 1");
        }
        Ok(config)
    }

    /// Parsed binding table for the hotkey engine
    pub fn bindings(&self) -> HashMap<String, KeySet> {
        self.hotkey
            .iter()
            .map(|(action, combo)| (action.clone(), KeySet::parse(combo)))
            .collect()
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;
        let user = PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE);
        debug!(path = %user.display(), "checking user config");
        user.exists().then_some(user)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let bindings = config.bindings();
        assert_eq!(bindings["translate"], KeySet::parse("ctrl+q"));
        assert_eq!(bindings["polish"], KeySet::parse("ctrl+shift+q"));
        assert_eq!(config.capture.clear_delay_ms, 50);
        assert_eq!(config.capture.copy_delay_ms, 100);
    }

    #[test]
    fn test_reads_original_layout_and_ignores_other_sections() {
        let json = r#"{
            "api": {"provider": "openai", "api_key": ""},
            "hotkey": {"translate": "ctrl+q", "polish": "ctrl+shift+q"},
            "ui": {"theme": "dark", "opacity": 0.95}
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.hotkey["translate"], "ctrl+q");
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[test]
    fn test_partial_hotkey_section_keeps_defaults() {
        let config = Config::from_json(r#"{"hotkey": {"translate": "Alt+T"}}"#).unwrap();
        assert_eq!(config.hotkey["translate"], "Alt+T");
        assert_eq!(config.hotkey["polish"], "Ctrl+Shift+Q");
    }

    #[test]
    fn test_extra_actions_and_disabled_action() {
        let config = Config::from_json(
            r#"{"hotkey": {"polish": "", "summarize": "Ctrl+Alt+S"}}"#,
        )
        .unwrap();
        let bindings = config.bindings();
        assert!(bindings["polish"].is_empty());
        assert_eq!(bindings["summarize"], KeySet::parse("ctrl+alt+s"));
    }

    #[test]
    fn test_capture_section() {
        let config = Config::from_json(r#"{"capture": {"copy_delay_ms": 120}}"#).unwrap();
        assert_eq!(config.capture.copy_delay_ms, 120);
        assert_eq!(config.capture.clear_delay_ms, 50);
    }

    #[test]
    fn test_zero_event_buffer_rejected() {
        assert!(Config::from_json(r#"{"event_buffer": 0}"#).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Config::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hotkey": {{"translate": "Cmd+T"}}}}"#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.bindings()["translate"], KeySet::parse("cmd+t"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }
}
