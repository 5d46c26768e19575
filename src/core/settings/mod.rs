//! Editor Settings
//!
//! The externally supplied configuration surface: the keybinding table and
//! the editor behavior flags. No persistence layer lives here — the host
//! decides where (and whether) settings are stored; this module only gives
//! them a schema with tolerant defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::input::BindingTable;

/// Settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Keybinding table (total: every action has a binding)
    #[serde(default)]
    pub shortcuts: BindingTable,

    /// When true, `next` on the last cue creates a new empty cue and
    /// focuses it instead of being a no-op
    #[serde(default = "default_true")]
    pub tab_creates_new_at_end: bool,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_true() -> bool {
    true
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            shortcuts: BindingTable::default(),
            tab_creates_new_at_end: true,
        }
    }
}

impl EditorSettings {
    /// Normalizes settings so loaded state is always usable.
    ///
    /// Bad values are corrected instead of rejected, so an old or
    /// hand-edited config never bricks the editor.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        let defaults = BindingTable::default();
        for action in crate::core::input::Action::ALL {
            if self.shortcuts.get(action).key.trim().is_empty() {
                warn!("Empty binding for {:?}, restoring default", action);
                self.shortcuts.set(action, defaults.get(action).clone());
            }
        }
    }

    /// Parses settings from JSON, falling back to defaults on failure.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(mut settings) => {
                settings.normalize();
                settings
            }
            Err(e) => {
                warn!("Failed to parse settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Serializes settings to pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{Action, Binding};

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert!(settings.tab_creates_new_at_end);
        assert_eq!(settings.shortcuts, BindingTable::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = EditorSettings::default();
        settings.tab_creates_new_at_end = false;
        settings
            .shortcuts
            .set(Action::Split, Binding::key("s").ctrl());

        let parsed = EditorSettings::from_json(&settings.to_json());
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_from_json_with_missing_fields() {
        let settings = EditorSettings::from_json(r#"{"tabCreatesNewAtEnd": false}"#);
        assert!(!settings.tab_creates_new_at_end);
        assert_eq!(settings.shortcuts, BindingTable::default());
    }

    #[test]
    fn test_from_json_garbage_falls_back_to_defaults() {
        assert_eq!(EditorSettings::from_json("not json"), EditorSettings::default());
    }

    #[test]
    fn test_normalize_restores_empty_binding() {
        let mut settings = EditorSettings::default();
        settings.shortcuts.set(Action::Merge, Binding::key("  "));
        settings.normalize();
        assert_eq!(settings.shortcuts.merge, BindingTable::default().merge);
    }
}
