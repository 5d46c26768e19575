//! Active-Cue Tracking
//!
//! Maps a continuous playback time to the "active" cue and decides when the
//! surrounding UI should reveal (scroll to) it.
//!
//! The tracker only reports a reveal when the active *id* actually changes,
//! so redundant downstream work is avoided while playback moves within one
//! cue. When the transition was caused by anchoring that same cue's start
//! to the playback time, the reveal is deferred by a one-second grace
//! period so the viewport isn't yanked while the operator is still working
//! on that row.
//!
//! There are no real timers here: the pending reveal is a single-slot
//! deadline polled with a caller-supplied monotonic clock. A superseding
//! transition replaces or cancels it (last write wins).

use crate::core::{CueId, TimeSec};

use super::models::Cue;

/// Grace period before revealing a cue whose start was just anchored
pub const SCROLL_GRACE_SEC: TimeSec = 1.0;

// =============================================================================
// Active Cue Lookup
// =============================================================================

/// Returns the first cue (in list order) whose closed time interval
/// contains `time`, if any.
///
/// When cues overlap, list order wins.
pub fn active_cue(cues: &[Cue], time: TimeSec) -> Option<&Cue> {
    cues.iter().find(|c| c.contains(time))
}

// =============================================================================
// Tracker
// =============================================================================

/// A reveal scheduled for after the grace period
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingReveal {
    id: CueId,
    due: TimeSec,
}

/// Tracks the active cue id across time updates and schedules reveals.
#[derive(Clone, Debug, Default)]
pub struct ActiveCueTracker {
    /// Currently active cue id, if playback is inside one
    active: Option<CueId>,
    /// Cue whose start was just anchored; its next reveal is deferred
    anchored: Option<CueId>,
    /// Single-slot deferred reveal (last write wins)
    pending: Option<PendingReveal>,
}

impl ActiveCueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently tracked active cue id.
    pub fn active_id(&self) -> Option<CueId> {
        self.active
    }

    /// Marks a cue as just-anchored so its next activation reveal is
    /// deferred by [`SCROLL_GRACE_SEC`].
    pub fn note_start_anchor(&mut self, id: CueId) {
        self.anchored = Some(id);
    }

    /// Feeds a new playback position (and possibly a new cue list) into
    /// the tracker.
    ///
    /// `now` is a monotonic timestamp in seconds used only for scheduling
    /// the deferred reveal. Returns the cue id to reveal immediately, or
    /// `None` when nothing changed or the reveal was deferred.
    pub fn update(&mut self, cues: &[Cue], time: TimeSec, now: TimeSec) -> Option<CueId> {
        let new_id = active_cue(cues, time).map(|c| c.id);
        if new_id == self.active {
            return None;
        }

        // Any transition supersedes a still-pending reveal.
        self.pending = None;
        self.active = new_id;

        let id = new_id?;
        if self.anchored == Some(id) {
            self.pending = Some(PendingReveal {
                id,
                due: now + SCROLL_GRACE_SEC,
            });
            None
        } else {
            Some(id)
        }
    }

    /// Fires the pending deferred reveal once its grace period has elapsed.
    pub fn poll(&mut self, now: TimeSec) -> Option<CueId> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        self.anchored = None;
        Some(pending.id)
    }

    /// Drops all tracked state (used when the cue list is replaced by an
    /// import).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Tests
// =============================================================================
