//! Keybinding Definitions and Matching
//!
//! Every editing action has exactly one binding (the table is total, with
//! defaults), and matching is exact-set: a binding with `shift: false`
//! does NOT match an event with shift held. Keys are compared after
//! normalization, which canonicalizes the space-bar's many spellings to
//! `"space"` and lower-cases everything else.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Actions
// =============================================================================

/// The fixed set of editing/navigation actions driven by keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Split the focused cue at the field cursor
    Split,
    /// Move focus to the next cue (or create one at the end)
    Next,
    /// Move focus to the previous cue
    Prev,
    /// Play/pause relative to the focused cue's range
    #[serde(rename = "playpause")]
    PlayPause,
    /// Merge the focused cue into its predecessor
    Merge,
    /// Anchor the focused cue's start to the playback time
    SetStart,
}

impl Action {
    /// All actions, in the field-scoped dispatch resolution order.
    pub const ALL: [Action; 6] = [
        Action::Split,
        Action::SetStart,
        Action::Merge,
        Action::PlayPause,
        Action::Next,
        Action::Prev,
    ];
}

// =============================================================================
// Key Normalization
// =============================================================================

/// Canonicalizes a key identifier for comparison.
///
/// The space bar arrives as `" "`, `""`, `"Space"`, or `"Spacebar"`
/// depending on the event source; all collapse to `"space"`. Everything
/// else is lower-cased so bindings are case-insensitive.
pub fn normalize_key(key: &str) -> String {
    match key {
        "" | " " => "space".to_string(),
        _ if key.eq_ignore_ascii_case("space") || key.eq_ignore_ascii_case("spacebar") => {
            "space".to_string()
        }
        _ => key.to_lowercase(),
    }
}

// =============================================================================
// Key Events
// =============================================================================

/// A captured keyboard event, as supplied by the host shell
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// Primary key identifier (e.g. `"Enter"`, `"t"`, `" "`)
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// True for a bare (unmodified) Tab press.
    pub fn is_bare_tab(&self) -> bool {
        normalize_key(&self.key) == "tab" && !self.ctrl && !self.alt && !self.shift && !self.meta
    }
}

// =============================================================================
// Bindings
// =============================================================================

/// A key plus an exact set of required modifiers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Case-insensitive key identifier
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Binding {
    pub fn key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Captures a binding from a key event (key and all modifier flags).
    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            key: event.key.clone(),
            ctrl: event.ctrl,
            alt: event.alt,
            shift: event.shift,
            meta: event.meta,
        }
    }

    /// Exact-set match: normalized keys equal AND all four modifier flags
    /// equal.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        normalize_key(&self.key) == normalize_key(&event.key)
            && self.ctrl == event.ctrl
            && self.alt == event.alt
            && self.shift == event.shift
            && self.meta == event.meta
    }
}

impl fmt::Display for Binding {
    /// Human-readable label, e.g. `Ctrl + Shift + T`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.meta {
            parts.push("Meta".to_string());
        }
        if normalize_key(&self.key) == "space" {
            parts.push("Space".to_string());
        } else {
            parts.push(self.key.to_uppercase());
        }
        write!(f, "{}", parts.join(" + "))
    }
}

// =============================================================================
// Binding Table
// =============================================================================

/// Total mapping from [`Action`] to [`Binding`].
///
/// One named field per action, so every action always has exactly one
/// binding; fields missing from a serialized form fall back to defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingTable {
    pub split: Binding,
    pub next: Binding,
    pub prev: Binding,
    #[serde(rename = "playpause")]
    pub playpause: Binding,
    pub merge: Binding,
    pub set_start: Binding,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self {
            split: Binding::key("Enter"),
            next: Binding::key("Tab"),
            prev: Binding::key("Tab").shift(),
            playpause: Binding::key("space").ctrl(),
            merge: Binding::key("Backspace").ctrl(),
            set_start: Binding::key("t").ctrl(),
        }
    }
}

impl BindingTable {
    /// The binding for an action.
    pub fn get(&self, action: Action) -> &Binding {
        match action {
            Action::Split => &self.split,
            Action::Next => &self.next,
            Action::Prev => &self.prev,
            Action::PlayPause => &self.playpause,
            Action::Merge => &self.merge,
            Action::SetStart => &self.set_start,
        }
    }

    /// Replaces the binding for an action.
    pub fn set(&mut self, action: Action, binding: Binding) {
        match action {
            Action::Split => self.split = binding,
            Action::Next => self.next = binding,
            Action::Prev => self.prev = binding,
            Action::PlayPause => self.playpause = binding,
            Action::Merge => self.merge = binding,
            Action::SetStart => self.set_start = binding,
        }
    }

    /// True if the action's binding matches the event.
    pub fn matches(&self, action: Action, event: &KeyEvent) -> bool {
        self.get(action).matches(event)
    }
}

// =============================================================================
// Rebinding Capture
// =============================================================================

/// State machine for capturing a replacement binding.
///
/// Idle, or editing exactly one action; starting an edit for another
/// action while one is in progress silently switches the target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingCapture {
    editing: Option<Action>,
}

impl BindingCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The action currently being rebound, if any.
    pub fn editing(&self) -> Option<Action> {
        self.editing
    }

    /// Enters (or retargets) capture mode for an action.
    pub fn begin(&mut self, action: Action) {
        self.editing = Some(action);
    }

    /// Leaves capture mode without changing anything.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Consumes a key event as the new binding for the action being
    /// edited, returning that action. Idle capture ignores the event.
    pub fn capture(&mut self, table: &mut BindingTable, event: &KeyEvent) -> Option<Action> {
        let action = self.editing.take()?;
        let binding = Binding::from_event(event);
        debug!("Rebinding {:?} to {}", action, binding);
        table.set(action, binding);
        Some(action)
    }
}

// =============================================================================
// Tests
// =============================================================================
