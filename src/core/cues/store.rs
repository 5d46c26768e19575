//! Cue Store Operations
//!
//! Pure structural mutations over the ordered cue list. Every operation
//! takes the current list by reference and returns a fresh list; cues are
//! never mutated in place, so callers can treat each result as a new
//! immutable revision of the track.
//!
//! List position is authoritative: operations insert at explicit positions
//! and never re-sort by time. Operations referencing an id that is no
//! longer present are logged no-ops.
//!
//! Text offsets (split cursor, merge selection) are *character* offsets,
//! clamped to the text length.

use tracing::{debug, warn};

use crate::core::{round_ms, CueId, TimeSec};

use super::models::{Cue, CuePatch};

/// Default duration for a cue created without a following neighbor
const NEW_CUE_DURATION: TimeSec = 2.0;

// =============================================================================
// Insertion & Removal
// =============================================================================

/// Inserts a new empty cue at `index`, deriving its time range from its
/// neighbors.
///
/// Start comes from the previous cue's end when one exists, else two
/// seconds before the next cue's start (floored at 0), else 0. End is the
/// midpoint between start and the next cue's start when one exists, else
/// start + 2 s. The new id is strictly larger than every existing id.
///
/// Returns the new list and the created cue's id.
pub fn insert_at(cues: &[Cue], index: usize) -> (Vec<Cue>, CueId) {
    let index = index.min(cues.len());
    let prev = index.checked_sub(1).and_then(|i| cues.get(i));
    let next = cues.get(index);

    let start = match (prev, next) {
        (Some(prev), _) => prev.end,
        (None, Some(next)) => (next.start - NEW_CUE_DURATION).max(0.0),
        (None, None) => 0.0,
    };
    let end = match next {
        Some(next) => (start + next.start) / 2.0,
        None => start + NEW_CUE_DURATION,
    };

    let new_id = next_cue_id(cues);
    let cue = Cue::new(new_id, round_ms(start), round_ms(end), "");

    let mut out = cues.to_vec();
    out.insert(index, cue);
    (out, new_id)
}

/// Removes the cue with the given id. Ids of the remaining cues are untouched.
pub fn delete_by_id(cues: &[Cue], id: CueId) -> Vec<Cue> {
    cues.iter().filter(|c| c.id != id).cloned().collect()
}

/// Returns an id strictly larger than every id in the list (1 when empty).
pub fn next_cue_id(cues: &[Cue]) -> CueId {
    cues.iter().map(|c| c.id).max().unwrap_or(0) + 1
}

// =============================================================================
// Field Updates
// =============================================================================

/// Shallow-merges `patch` into the cue with the given id.
pub fn update_cue(cues: &[Cue], id: CueId, patch: &CuePatch) -> Vec<Cue> {
    if !cues.iter().any(|c| c.id == id) {
        warn!("update_cue: cue {} not found, ignoring", id);
        return cues.to_vec();
    }
    cues.iter()
        .map(|c| if c.id == id { patch.apply(c) } else { c.clone() })
        .collect()
}

/// Anchors the cue's start to `time` (rounded to milliseconds).
///
/// Adjacent boundaries stay touching: when a predecessor exists in list
/// order, its end is set to the same time.
///
/// Returns the new list and, when the cue was found, its id — the marker
/// callers use to defer scroll feedback for this cue (see
/// [`super::tracker::ActiveCueTracker::note_start_anchor`]).
pub fn set_start_to_time(cues: &[Cue], id: CueId, time: TimeSec) -> (Vec<Cue>, Option<CueId>) {
    let Some(pos) = cues.iter().position(|c| c.id == id) else {
        warn!("set_start_to_time: cue {} not found, ignoring", id);
        return (cues.to_vec(), None);
    };

    let t = round_ms(time);
    let mut out = cues.to_vec();
    out[pos].start = t;
    if pos > 0 {
        out[pos - 1].end = t;
    }
    (out, Some(id))
}

/// Sets only the cue's end to `time` (rounded to milliseconds).
pub fn set_end_to_time(cues: &[Cue], id: CueId, time: TimeSec) -> Vec<Cue> {
    let Some(pos) = cues.iter().position(|c| c.id == id) else {
        warn!("set_end_to_time: cue {} not found, ignoring", id);
        return cues.to_vec();
    };

    let mut out = cues.to_vec();
    out[pos].end = round_ms(time);
    out
}

// =============================================================================
// Split
// =============================================================================

/// Splits the cue with the given id into two at the field cursor.
///
/// `text` is the field's live text (it may be fresher than the stored
/// text); it is divided at `cursor_offset` into the truncated cue's text
/// and the new cue's text, with any leading newlines stripped from the
/// right half.
///
/// The split time is `playback_time` (rounded to milliseconds) when it
/// falls strictly inside the cue's range, else the range midpoint; a
/// degenerate range also falls back to the midpoint.
///
/// Returns the new list and the created cue's id.
pub fn split_cue(
    cues: &[Cue],
    id: CueId,
    text: &str,
    cursor_offset: usize,
    playback_time: TimeSec,
) -> (Vec<Cue>, Option<CueId>) {
    let Some(pos) = cues.iter().position(|c| c.id == id) else {
        warn!("split_cue: cue {} not found, ignoring", id);
        return (cues.to_vec(), None);
    };

    let cue = &cues[pos];
    let cut = byte_offset(text, cursor_offset);
    let left_text = &text[..cut];
    let right_text = text[cut..].trim_start_matches('\n');

    let midpoint = round_ms(cue.midpoint());
    let t = round_ms(playback_time);
    let mut split_t = if t > cue.start && t < cue.end {
        t
    } else {
        midpoint
    };
    if split_t <= cue.start || split_t >= cue.end {
        split_t = midpoint;
    }
    debug!(
        "Splitting cue {} at {:.3}s (range {:.3}~{:.3})",
        id, split_t, cue.start, cue.end
    );

    let new_id = next_cue_id(cues);
    let new_cue = Cue::new(new_id, split_t, cue.end, right_text);

    let mut out = cues.to_vec();
    out[pos].end = split_t;
    out[pos].text = left_text.to_string();
    out.insert(pos + 1, new_cue);
    (out, Some(new_id))
}

// =============================================================================
// Merge
// =============================================================================

/// Merges the cue with the given id into its immediate predecessor.
///
/// Two behaviors, selected by the caller's current text selection:
///
/// - Non-empty selection: the selected span is *moved* from this cue's
///   text onto the end of the predecessor's text. The cue itself stays,
///   shortened; no time fields change.
/// - No selection: the predecessor absorbs the whole cue — its text gains
///   this cue's text, its end becomes this cue's end, and the cue is
///   removed from the list.
///
/// A cue with no predecessor is a no-op.
pub fn merge_with_previous(
    cues: &[Cue],
    id: CueId,
    selection: Option<(usize, usize)>,
) -> Vec<Cue> {
    let Some(pos) = cues.iter().position(|c| c.id == id) else {
        warn!("merge_with_previous: cue {} not found, ignoring", id);
        return cues.to_vec();
    };
    if pos == 0 {
        debug!("merge_with_previous: cue {} has no predecessor, ignoring", id);
        return cues.to_vec();
    }

    let selection = selection
        .map(|(a, b)| (a.min(b), a.max(b)))
        .filter(|(a, b)| a != b);

    let mut out = cues.to_vec();
    match selection {
        Some((sel_start, sel_end)) => {
            // Pull the selected span left; the cue keeps its place and times.
            let text = &cues[pos].text;
            let from = byte_offset(text, sel_start);
            let to = byte_offset(text, sel_end);
            out[pos - 1].text.push_str(&text[from..to]);
            let mut remainder = String::with_capacity(text.len() - (to - from));
            remainder.push_str(&text[..from]);
            remainder.push_str(&text[to..]);
            out[pos].text = remainder;
        }
        None => {
            // Absorb the whole cue into the predecessor.
            let absorbed = out.remove(pos);
            out[pos - 1].text.push_str(&absorbed.text);
            out[pos - 1].end = absorbed.end;
        }
    }
    out
}

// =============================================================================
// Helpers
// =============================================================================

/// Byte index of the given character offset, clamped to the text length.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn sample() -> Vec<Cue> {
        vec![
            Cue::new(1, 0.0, 5.0, "first"),
            Cue::new(2, 5.0, 12.0, "second"),
            Cue::new(3, 12.0, 15.0, "third"),
        ]
    }

    // -------------------------------------------------------------------------
    // Insert Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_insert_between_neighbors() {
        let cues = sample();
        let (out, new_id) = insert_at(&cues, 1);

        assert_eq!(out.len(), 4);
        assert_eq!(new_id, 4);
        assert_eq!(out[1].id, 4);
        // start = prev.end, end = midpoint to next.start
        assert_eq!(out[1].start, 5.0);
        assert_eq!(out[1].end, 5.0);
        assert_eq!(out[1].text, "");
    }

    #[test]
    fn test_insert_after_gap() {
        let cues = vec![
            Cue::new(1, 0.0, 2.0, "a"),
            Cue::new(2, 10.0, 12.0, "b"),
        ];
        let (out, _) = insert_at(&cues, 1);

        assert_eq!(out[1].start, 2.0);
        assert_eq!(out[1].end, 6.0); // (2 + 10) / 2
    }

    #[test]
    fn test_insert_at_end() {
        let cues = sample();
        let (out, new_id) = insert_at(&cues, 3);

        assert_eq!(out[3].id, new_id);
        assert_eq!(out[3].start, 15.0);
        assert_eq!(out[3].end, 17.0);
    }

    #[test]
    fn test_insert_at_front() {
        let cues = sample();
        let (out, _) = insert_at(&cues, 0);

        // No predecessor: back off 2 s from the next cue's start, floored at 0.
        assert_eq!(out[0].start, 0.0);
        assert_eq!(out[0].end, 0.0); // (0 + 0) / 2
    }

    #[test]
    fn test_insert_at_front_with_room() {
        let cues = vec![Cue::new(1, 6.0, 8.0, "late start")];
        let (out, _) = insert_at(&cues, 0);

        assert_eq!(out[0].start, 4.0);
        assert_eq!(out[0].end, 5.0);
    }

    #[test]
    fn test_insert_into_empty_list() {
        let (out, new_id) = insert_at(&[], 0);

        assert_eq!(new_id, 1);
        assert_eq!(out, vec![Cue::new(1, 0.0, 2.0, "")]);
    }

    #[test]
    fn test_insert_id_exceeds_all_existing() {
        let cues = vec![Cue::new(7, 0.0, 1.0, "a"), Cue::new(3, 1.0, 2.0, "b")];
        let (_, new_id) = insert_at(&cues, 2);
        assert_eq!(new_id, 8);
    }

    #[test]
    fn test_insert_rounds_to_milliseconds() {
        let cues = vec![
            Cue::new(1, 0.0, 1.000_4, "a"),
            Cue::new(2, 2.000_3, 3.0, "b"),
        ];
        let (out, _) = insert_at(&cues, 1);

        assert_eq!(out[1].start, 1.0);
        assert_eq!(out[1].end, 1.5); // round_ms((1.0004 + 2.0003) / 2)
    }

    // -------------------------------------------------------------------------
    // Delete & Update Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_delete_by_id() {
        let out = delete_by_id(&sample(), 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, 1);
        assert_eq!(out[1].id, 3);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let cues = sample();
        assert_eq!(delete_by_id(&cues, 99), cues);
    }

    #[test]
    fn test_update_cue() {
        let out = update_cue(&sample(), 2, &CuePatch::text("rewritten"));
        assert_eq!(out[1].text, "rewritten");
        assert_eq!(out[1].start, 5.0);
        assert_eq!(out[0].text, "first");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        init_tracing();
        let cues = sample();
        assert_eq!(update_cue(&cues, 99, &CuePatch::text("x")), cues);
    }

    // -------------------------------------------------------------------------
    // Time Anchor Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_start_moves_both_boundaries() {
        let cues = vec![Cue::new(1, 0.0, 5.0, "a"), Cue::new(2, 5.0, 12.0, "b")];
        let (out, marker) = set_start_to_time(&cues, 2, 10.5);

        assert_eq!(out[1].start, 10.5);
        assert_eq!(out[0].end, 10.5);
        assert_eq!(marker, Some(2));
    }

    #[test]
    fn test_set_start_on_first_cue_has_no_neighbor_effect() {
        let cues = sample();
        let (out, marker) = set_start_to_time(&cues, 1, 1.25);

        assert_eq!(out[0].start, 1.25);
        assert_eq!(out[1], cues[1]);
        assert_eq!(marker, Some(1));
    }

    #[test]
    fn test_set_start_rounds_to_milliseconds() {
        let (out, _) = set_start_to_time(&sample(), 2, 7.123_456);
        assert_eq!(out[1].start, 7.123);
        assert_eq!(out[0].end, 7.123);
    }

    #[test]
    fn test_set_start_missing_id() {
        let cues = sample();
        let (out, marker) = set_start_to_time(&cues, 99, 1.0);
        assert_eq!(out, cues);
        assert_eq!(marker, None);
    }

    #[test]
    fn test_set_end_only_touches_target() {
        let cues = sample();
        let out = set_end_to_time(&cues, 1, 4.2);

        assert_eq!(out[0].end, 4.2);
        assert_eq!(out[1], cues[1]);
    }

    // -------------------------------------------------------------------------
    // Split Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_split_at_playback_time() {
        let cues = vec![Cue::new(1, 0.0, 10.0, "AB")];
        let (out, new_id) = split_cue(&cues, 1, "AB", 1, 4.0);

        assert_eq!(new_id, Some(2));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Cue::new(1, 0.0, 4.0, "A"));
        assert_eq!(out[1], Cue::new(2, 4.0, 10.0, "B"));
    }

    #[test]
    fn test_split_outside_playback_falls_back_to_midpoint() {
        let cues = vec![Cue::new(1, 2.0, 6.0, "hello there")];
        let (out, _) = split_cue(&cues, 1, "hello there", 5, 30.0);

        assert_eq!(out[0].end, 4.0);
        assert_eq!(out[1].start, 4.0);
        assert_eq!(out[0].text, "hello");
        assert_eq!(out[1].text, " there");
    }

    #[test]
    fn test_split_at_exact_boundary_uses_midpoint() {
        // Playback exactly at start is not strictly inside.
        let cues = vec![Cue::new(1, 2.0, 6.0, "xy")];
        let (out, _) = split_cue(&cues, 1, "xy", 1, 2.0);
        assert_eq!(out[0].end, 4.0);
    }

    #[test]
    fn test_split_strips_leading_newlines_from_right() {
        let cues = vec![Cue::new(1, 0.0, 4.0, "one\n\ntwo")];
        let (out, _) = split_cue(&cues, 1, "one\n\ntwo", 3, 2.0);

        assert_eq!(out[0].text, "one");
        assert_eq!(out[1].text, "two");
    }

    #[test]
    fn test_split_uses_live_field_text() {
        // The field can hold newer text than the stored cue.
        let cues = vec![Cue::new(1, 0.0, 4.0, "stale")];
        let (out, _) = split_cue(&cues, 1, "fresh text", 5, 1.0);

        assert_eq!(out[0].text, "fresh");
        assert_eq!(out[1].text, " text");
    }

    #[test]
    fn test_split_cursor_clamped_to_text_end() {
        let cues = vec![Cue::new(1, 0.0, 4.0, "ab")];
        let (out, _) = split_cue(&cues, 1, "ab", 99, 1.0);

        assert_eq!(out[0].text, "ab");
        assert_eq!(out[1].text, "");
    }

    #[test]
    fn test_split_multibyte_cursor_offset() {
        let cues = vec![Cue::new(1, 0.0, 4.0, "日本語です")];
        let (out, _) = split_cue(&cues, 1, "日本語です", 3, 2.0);

        assert_eq!(out[0].text, "日本語");
        assert_eq!(out[1].text, "です");
    }

    #[test]
    fn test_split_degenerate_range_still_splits_at_midpoint() {
        let cues = vec![Cue::new(1, 3.0, 3.0, "ab")];
        let (out, new_id) = split_cue(&cues, 1, "ab", 1, 3.0);

        assert_eq!(new_id, Some(2));
        assert_eq!(out[0].end, 3.0);
        assert_eq!(out[1].start, 3.0);
    }

    #[test]
    fn test_split_combined_range_equals_original() {
        let cues = vec![Cue::new(1, 1.5, 9.25, "AB")];
        let (out, _) = split_cue(&cues, 1, "AB", 1, 3.125);

        assert_eq!(out[0].start, 1.5);
        assert_eq!(out[0].end, out[1].start);
        assert_eq!(out[1].end, 9.25);
    }

    // -------------------------------------------------------------------------
    // Merge Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_merge_without_selection_absorbs_cue() {
        let cues = vec![
            Cue::new(1, 0.0, 5.0, "Hello "),
            Cue::new(2, 5.0, 9.0, "World"),
        ];
        let out = merge_with_previous(&cues, 2, None);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Hello World");
        assert_eq!(out[0].start, 0.0);
        assert_eq!(out[0].end, 9.0);
    }

    #[test]
    fn test_merge_with_empty_parts() {
        let cues = vec![Cue::new(1, 0.0, 5.0, ""), Cue::new(2, 5.0, 9.0, "solo")];
        let out = merge_with_previous(&cues, 2, None);

        assert_eq!(out[0].text, "solo");
    }

    #[test]
    fn test_merge_with_selection_moves_span_only() {
        let cues = vec![
            Cue::new(1, 0.0, 5.0, "keep"),
            Cue::new(2, 5.0, 9.0, "abcdef"),
        ];
        let out = merge_with_previous(&cues, 2, Some((0, 3)));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "keepabc");
        assert_eq!(out[1].text, "def");
        // Times unchanged on both sides.
        assert_eq!(out[0].end, 5.0);
        assert_eq!(out[1].start, 5.0);
        assert_eq!(out[1].end, 9.0);
    }

    #[test]
    fn test_merge_with_mid_selection() {
        let cues = vec![Cue::new(1, 0.0, 1.0, "p"), Cue::new(2, 1.0, 2.0, "xable")];
        let out = merge_with_previous(&cues, 2, Some((1, 5)));

        assert_eq!(out[0].text, "pable");
        assert_eq!(out[1].text, "x");
    }

    #[test]
    fn test_merge_empty_selection_behaves_like_none() {
        let cues = vec![Cue::new(1, 0.0, 1.0, "a"), Cue::new(2, 1.0, 2.0, "b")];
        let out = merge_with_previous(&cues, 2, Some((2, 2)));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "ab");
        assert_eq!(out[0].end, 2.0);
    }

    #[test]
    fn test_merge_first_cue_is_noop() {
        let cues = sample();
        assert_eq!(merge_with_previous(&cues, 1, None), cues);
    }

    #[test]
    fn test_merge_missing_id_is_noop() {
        init_tracing();
        let cues = sample();
        assert_eq!(merge_with_previous(&cues, 99, None), cues);
    }
}
