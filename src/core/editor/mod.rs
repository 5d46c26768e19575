//! Editor Session
//!
//! The stateful session object the host shell talks to: it owns the cue
//! list, the settings, the active-cue tracker, and the latest playback
//! snapshot, and it resolves keyboard input into cue-store operations.
//!
//! Every mutation happens synchronously inside the call that triggers it;
//! there is exactly one logical writer. Anything the engine needs the
//! outside world to do comes back as an [`Effect`] for the host to apply —
//! playback control, focusing a cue's text field (after the next render,
//! so the element exists), or scrolling a cue into view.

use tracing::{debug, warn};

use crate::core::cues::{
    active_cue, export_srt, parse_plain_text, parse_srt, store, ActiveCueTracker, Cue, CuePatch,
    DEFAULT_SECONDS_PER_LINE,
};
use crate::core::input::{Action, BindingCapture, KeyEvent};
use crate::core::settings::EditorSettings;
use crate::core::{CueId, TimeSec};

/// How far before a cue's start the per-row preview begins
pub const PREVIEW_LEAD_SEC: TimeSec = 0.5;

// =============================================================================
// Playback & Effects
// =============================================================================

/// The playback collaborator's most recent state, read-only to the engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    /// Current playback position in seconds
    pub time: TimeSec,
    /// Whether playback is paused
    pub paused: bool,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            time: 0.0,
            paused: true,
        }
    }
}

/// A side effect for the host shell to apply
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Seek to the given time and start playback
    PlayFrom(TimeSec),
    /// Pause playback in place
    Pause,
    /// Focus the cue's text field, after the next render so a newly
    /// created row exists in the rendered output first
    FocusCue(CueId),
    /// Scroll the cue into view
    RevealCue(CueId),
}

/// Result of offering a key event to the dispatcher
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatch {
    /// True when a binding matched; the host must then suppress the
    /// event's default handling
    pub handled: bool,
    /// Effects to apply, in order
    pub effects: Vec<Effect>,
}

impl Dispatch {
    fn unhandled() -> Self {
        Self::default()
    }

    fn handled(effects: Vec<Effect>) -> Self {
        Self {
            handled: true,
            effects,
        }
    }
}

/// Live state of the focused cue's text field at the moment of a key event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldState {
    /// The field's current text (may be fresher than the stored cue text)
    pub text: String,
    /// Cursor position as a character offset
    pub cursor: usize,
    /// Selection range as character offsets, if any text is selected
    pub selection: Option<(usize, usize)>,
}

// =============================================================================
// Editor
// =============================================================================

/// A subtitle editing session
#[derive(Clone, Debug, Default)]
pub struct Editor {
    cues: Vec<Cue>,
    settings: EditorSettings,
    capture: BindingCapture,
    tracker: ActiveCueTracker,
    playback: PlaybackSnapshot,
    focused: Option<CueId>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The current cue list revision.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, mut settings: EditorSettings) {
        settings.normalize();
        self.settings = settings;
    }

    pub fn playback(&self) -> PlaybackSnapshot {
        self.playback
    }

    /// The cue whose text field currently has focus, as reported by the host.
    pub fn focused(&self) -> Option<CueId> {
        self.focused
    }

    /// Reports a focus change from the host (including after it applies a
    /// [`Effect::FocusCue`]).
    pub fn set_focused(&mut self, id: Option<CueId>) {
        self.focused = id;
    }

    /// The currently active cue id, if playback is inside one.
    pub fn active_id(&self) -> Option<CueId> {
        self.tracker.active_id()
    }

    // -------------------------------------------------------------------------
    // Import / Export
    // -------------------------------------------------------------------------

    /// Replaces the cue list with one parsed from an SRT document.
    pub fn import_srt(&mut self, content: &str) {
        self.replace_cues(parse_srt(content));
    }

    /// Replaces the cue list with evenly-spaced cues from plain text,
    /// one per non-blank line, 5 seconds each.
    pub fn import_plain_text(&mut self, text: &str) {
        self.replace_cues(parse_plain_text(text, DEFAULT_SECONDS_PER_LINE));
    }

    /// Serializes the current cue list to an SRT document.
    pub fn export_srt(&self) -> String {
        export_srt(&self.cues)
    }

    fn replace_cues(&mut self, cues: Vec<Cue>) {
        debug!("Replacing cue list: {} cues", cues.len());
        self.cues = cues;
        self.tracker.reset();
        self.focused = None;
    }

    // -------------------------------------------------------------------------
    // Playback Updates
    // -------------------------------------------------------------------------

    /// Feeds a playback time update into the engine.
    ///
    /// `now` is a monotonic timestamp used to schedule the deferred reveal
    /// after a start-anchor edit. Returns a reveal effect when the active
    /// cue changed.
    pub fn on_time_update(&mut self, time: TimeSec, paused: bool, now: TimeSec) -> Option<Effect> {
        self.playback = PlaybackSnapshot { time, paused };
        self.tracker
            .update(&self.cues, time, now)
            .map(Effect::RevealCue)
    }

    /// Fires the pending deferred reveal once its grace period elapses.
    pub fn tick(&mut self, now: TimeSec) -> Option<Effect> {
        self.tracker.poll(now).map(Effect::RevealCue)
    }

    // -------------------------------------------------------------------------
    // Row Operations
    // -------------------------------------------------------------------------

    /// Inserts a new empty cue after the given one and asks the host to
    /// focus it.
    pub fn insert_after(&mut self, id: CueId) -> Option<Effect> {
        let pos = self.position_of(id, "insert_after")?;
        let (cues, new_id) = store::insert_at(&self.cues, pos + 1);
        self.cues = cues;
        Some(Effect::FocusCue(new_id))
    }

    /// Deletes the cue with the given id.
    pub fn delete(&mut self, id: CueId) {
        self.cues = store::delete_by_id(&self.cues, id);
    }

    /// Shallow-merges a patch into the cue with the given id.
    pub fn update(&mut self, id: CueId, patch: &CuePatch) {
        self.cues = store::update_cue(&self.cues, id, patch);
    }

    /// Anchors the cue's start (and its predecessor's end) to the current
    /// playback time; the cue's next activation reveal is deferred.
    pub fn set_start_to_current(&mut self, id: CueId) {
        let (cues, anchored) = store::set_start_to_time(&self.cues, id, self.playback.time);
        self.cues = cues;
        if let Some(id) = anchored {
            self.tracker.note_start_anchor(id);
        }
    }

    /// Sets the cue's end to the current playback time.
    pub fn set_end_to_current(&mut self, id: CueId) {
        self.cues = store::set_end_to_time(&self.cues, id, self.playback.time);
    }

    /// Plays from half a second before the cue's start.
    pub fn preview_from(&self, id: CueId) -> Option<Effect> {
        let cue = self.cues.iter().find(|c| c.id == id)?;
        Some(Effect::PlayFrom((cue.start - PREVIEW_LEAD_SEC).max(0.0)))
    }

    /// Pauses playback.
    pub fn pause(&self) -> Effect {
        Effect::Pause
    }

    // -------------------------------------------------------------------------
    // Rebinding
    // -------------------------------------------------------------------------

    /// Enters (or retargets) binding capture mode for an action.
    pub fn begin_rebind(&mut self, action: Action) {
        self.capture.begin(action);
    }

    /// Consumes a key event as the new binding for the action being
    /// rebound. Returns the action on success.
    pub fn capture_binding(&mut self, event: &KeyEvent) -> Option<Action> {
        self.capture.capture(&mut self.settings.shortcuts, event)
    }

    /// The action currently awaiting a new binding, if any.
    pub fn rebinding(&self) -> Option<Action> {
        self.capture.editing()
    }

    // -------------------------------------------------------------------------
    // Keyboard Dispatch — field-scoped
    // -------------------------------------------------------------------------

    /// Dispatches a key event captured while the given cue's text field
    /// has focus.
    ///
    /// Bindings are tested in a fixed order — split, setStart, merge,
    /// playpause, next, prev — and the first match wins; any match means
    /// the host must suppress the event's default handling.
    pub fn handle_field_key(&mut self, id: CueId, event: &KeyEvent, field: &FieldState) -> Dispatch {
        let shortcuts = &self.settings.shortcuts;

        if shortcuts.matches(Action::Split, event) {
            return self.do_split(id, field);
        }
        if shortcuts.matches(Action::SetStart, event) {
            self.set_start_to_current(id);
            return Dispatch::handled(vec![]);
        }
        if shortcuts.matches(Action::Merge, event) {
            self.cues = store::merge_with_previous(&self.cues, id, field.selection);
            return Dispatch::handled(vec![]);
        }
        if shortcuts.matches(Action::PlayPause, event) {
            return self.do_row_playpause(id);
        }
        if shortcuts.matches(Action::Next, event) {
            return self.do_next(id);
        }
        if shortcuts.matches(Action::Prev, event) {
            return self.do_prev(id);
        }

        Dispatch::unhandled()
    }

    fn do_split(&mut self, id: CueId, field: &FieldState) -> Dispatch {
        let (cues, new_id) =
            store::split_cue(&self.cues, id, &field.text, field.cursor, self.playback.time);
        self.cues = cues;
        match new_id {
            Some(new_id) => Dispatch::handled(vec![Effect::FocusCue(new_id)]),
            None => Dispatch::handled(vec![]),
        }
    }

    /// Row-aware play/pause: paused playback always previews this row from
    /// its own start; live playback pauses in place only while inside the
    /// row's range, and otherwise jumps back to the row's start.
    fn do_row_playpause(&mut self, id: CueId) -> Dispatch {
        let Some(cue) = self.cues.iter().find(|c| c.id == id) else {
            warn!("playpause: cue {} not found, ignoring", id);
            return Dispatch::handled(vec![]);
        };

        let effect = if self.playback.paused {
            Effect::PlayFrom(cue.start)
        } else if cue.contains(self.playback.time) {
            Effect::Pause
        } else {
            Effect::PlayFrom(cue.start)
        };
        Dispatch::handled(vec![effect])
    }

    fn do_next(&mut self, id: CueId) -> Dispatch {
        let Some(pos) = self.position_of(id, "next") else {
            return Dispatch::handled(vec![]);
        };

        if let Some(next) = self.cues.get(pos + 1) {
            return Dispatch::handled(vec![Effect::FocusCue(next.id)]);
        }
        if self.settings.tab_creates_new_at_end {
            let (cues, new_id) = store::insert_at(&self.cues, pos + 1);
            self.cues = cues;
            return Dispatch::handled(vec![Effect::FocusCue(new_id)]);
        }
        Dispatch::handled(vec![])
    }

    fn do_prev(&mut self, id: CueId) -> Dispatch {
        let Some(pos) = self.position_of(id, "prev") else {
            return Dispatch::handled(vec![]);
        };

        match pos.checked_sub(1).and_then(|i| self.cues.get(i)) {
            Some(prev) => Dispatch::handled(vec![Effect::FocusCue(prev.id)]),
            None => Dispatch::handled(vec![]),
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Dispatch — global
    // -------------------------------------------------------------------------

    /// Dispatches a key event captured while no cue text field has focus.
    ///
    /// Only the playpause binding applies here, and it is range-unaware:
    /// paused playback resumes from the current position, live playback
    /// pauses in place.
    pub fn handle_global_key(&mut self, event: &KeyEvent) -> Dispatch {
        if !self.settings.shortcuts.matches(Action::PlayPause, event) {
            return Dispatch::unhandled();
        }

        let effect = if self.playback.paused {
            Effect::PlayFrom(self.playback.time)
        } else {
            Effect::Pause
        };
        Dispatch::handled(vec![effect])
    }

    /// Handles a bare Tab press while no cue text field has focus: focuses
    /// the active cue, or the cue whose midpoint is closest to the
    /// playback time.
    ///
    /// Independent of the configurable binding table.
    pub fn handle_global_tab(&mut self, event: &KeyEvent) -> Dispatch {
        if !event.is_bare_tab() || self.focused.is_some() {
            return Dispatch::unhandled();
        }

        let time = self.playback.time;
        let target = active_cue(&self.cues, time).or_else(|| {
            self.cues
                .iter()
                .min_by(|a, b| {
                    (a.midpoint() - time)
                        .abs()
                        .total_cmp(&(b.midpoint() - time).abs())
                })
        });

        match target {
            Some(cue) => Dispatch::handled(vec![Effect::FocusCue(cue.id)]),
            None => Dispatch::unhandled(),
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn position_of(&self, id: CueId, op: &str) -> Option<usize> {
        let pos = self.cues.iter().position(|c| c.id == id);
        if pos.is_none() {
            warn!("{}: cue {} not found, ignoring", op, id);
        }
        pos
    }
}

// =============================================================================
// Tests
// =============================================================================
