//! Cue Data Models
//!
//! Defines the core timed-cue entity and the patch type used for field
//! updates.
//!
//! # Overview
//!
//! A cue list is an *ordered* sequence: list position is the authoritative
//! order, assigned by the caller at insertion time, and is never re-derived
//! from the time fields. Times are not validated against each other either;
//! a degenerate range (`end < start`) is representable and downstream
//! consumers must tolerate it.

use serde::{Deserialize, Serialize};

use crate::core::{CueId, TimeSec};

// =============================================================================
// Cue
// =============================================================================

/// A single subtitle cue with timing and text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Unique identifier, never reused within a session
    pub id: CueId,
    /// Start time in seconds
    pub start: TimeSec,
    /// End time in seconds (not clamped to be >= start)
    pub end: TimeSec,
    /// Cue text (may contain line breaks)
    pub text: String,
}

impl Cue {
    /// Creates a new cue with the given timing and text
    pub fn new(id: CueId, start: TimeSec, end: TimeSec, text: &str) -> Self {
        Self {
            id,
            start,
            end,
            text: text.to_string(),
        }
    }

    /// Returns the duration of this cue in seconds
    pub fn duration(&self) -> TimeSec {
        self.end - self.start
    }

    /// Returns true if the given time falls within this cue.
    ///
    /// The interval is closed at both ends: a time exactly equal to `end`
    /// still counts as inside, matching how the active cue is highlighted
    /// during playback.
    pub fn contains(&self, time_sec: TimeSec) -> bool {
        time_sec >= self.start && time_sec <= self.end
    }

    /// Returns the midpoint of this cue's time range
    pub fn midpoint(&self) -> TimeSec {
        (self.start + self.end) / 2.0
    }
}

// =============================================================================
// CuePatch
// =============================================================================

/// A partial update shallow-merged into a single cue.
///
/// Fields left as `None` keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeSec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeSec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CuePatch {
    /// Patch that only replaces the start time
    pub fn start(start: TimeSec) -> Self {
        Self {
            start: Some(start),
            ..Default::default()
        }
    }

    /// Patch that only replaces the end time
    pub fn end(end: TimeSec) -> Self {
        Self {
            end: Some(end),
            ..Default::default()
        }
    }

    /// Patch that only replaces the text
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Applies this patch to a cue, returning the merged cue
    pub fn apply(&self, cue: &Cue) -> Cue {
        Cue {
            id: cue.id,
            start: self.start.unwrap_or(cue.start),
            end: self.end.unwrap_or(cue.end),
            text: self.text.clone().unwrap_or_else(|| cue.text.clone()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_creation() {
        let cue = Cue::new(1, 0.0, 5.0, "Hello World");
        assert_eq!(cue.id, 1);
        assert_eq!(cue.start, 0.0);
        assert_eq!(cue.end, 5.0);
        assert_eq!(cue.text, "Hello World");
    }

    #[test]
    fn test_cue_duration() {
        let cue = Cue::new(1, 1.5, 4.5, "Test");
        assert_eq!(cue.duration(), 3.0);
    }

    #[test]
    fn test_cue_contains_closed_interval() {
        let cue = Cue::new(1, 2.0, 5.0, "Test");

        assert!(!cue.contains(1.999));
        assert!(cue.contains(2.0));
        assert!(cue.contains(3.5));
        assert!(cue.contains(5.0));
        assert!(!cue.contains(5.001));
    }

    #[test]
    fn test_degenerate_range_is_representable() {
        let cue = Cue::new(1, 5.0, 3.0, "backwards");
        assert!(cue.duration() < 0.0);
        assert!(!cue.contains(4.0));
    }

    #[test]
    fn test_patch_apply() {
        let cue = Cue::new(3, 1.0, 2.0, "before");
        let patched = CuePatch::text("after").apply(&cue);
        assert_eq!(patched.id, 3);
        assert_eq!(patched.start, 1.0);
        assert_eq!(patched.end, 2.0);
        assert_eq!(patched.text, "after");

        let patched = CuePatch {
            start: Some(0.5),
            end: Some(2.5),
            text: None,
        }
        .apply(&cue);
        assert_eq!(patched.start, 0.5);
        assert_eq!(patched.end, 2.5);
        assert_eq!(patched.text, "before");
    }

    #[test]
    fn test_cue_serialization() {
        let cue = Cue::new(1, 1.5, 4.5, "Hello\nWorld");
        let json = serde_json::to_string(&cue).unwrap();
        let parsed: Cue = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, cue);
    }

    #[test]
    fn test_patch_serialization_skips_unset_fields() {
        let patch = CuePatch::start(1.0);
        let json = serde_json::to_string(&patch).unwrap();
        assert!(json.contains("start"));
        assert!(!json.contains("end"));
        assert!(!json.contains("text"));
    }
}
