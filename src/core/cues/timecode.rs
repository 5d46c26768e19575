//! Timecode Codec
//!
//! Converts between seconds and the two textual timecode formats in use:
//!
//! - SRT: `HH:MM:SS,mmm` (comma separator, fixed widths)
//! - Editor fields: `HH:MM:SS.mmm` (dot separator, hours may be any width,
//!   milliseconds optional)
//!
//! Strict parsers return [`ParseError`]; the lenient `parse_*` forms used by
//! the interactive surface fall back to `0.0` on any mismatch so a half-typed
//! timecode never aborts an edit.

use tracing::debug;

use crate::core::{ParseError, ParseResult, TimeSec};

/// Tolerance in milliseconds applied before floor truncation.
///
/// f64 cannot represent most `n / 1000` values exactly, so a parsed
/// timecode can sit a few nano-milliseconds below its intended value;
/// without the nudge, flooring would drop a whole millisecond and
/// timecodes would not survive a parse/format round trip.
const MS_FLOOR_TOLERANCE: f64 = 1e-4;

// =============================================================================
// SRT Timecodes (HH:MM:SS,mmm)
// =============================================================================

/// Parses an SRT timecode (e.g. `00:01:23,456`) into seconds.
pub fn parse_srt_timecode_strict(text: &str) -> ParseResult<TimeSec> {
    let trimmed = text.trim();
    let (hms, ms) = trimmed
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;

    let fields: Vec<&str> = hms.split(':').collect();
    if fields.len() != 3 {
        return Err(ParseError::InvalidTimestamp(text.to_string()));
    }

    let hours = parse_fixed_digits(fields[0], 2)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;
    let minutes = parse_fixed_digits(fields[1], 2)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;
    let seconds = parse_fixed_digits(fields[2], 2)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;
    let millis =
        parse_fixed_digits(ms, 3).ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

/// Lenient SRT timecode parser: `0.0` on any mismatch.
pub fn parse_srt_timecode(text: &str) -> TimeSec {
    match parse_srt_timecode_strict(text) {
        Ok(sec) => sec,
        Err(err) => {
            debug!("Unparseable SRT timecode, falling back to 0: {}", err);
            0.0
        }
    }
}

/// Formats seconds as an SRT timecode (`00:00:00,000`).
///
/// Components are floor-truncated, not rounded: `1.9996` formats as
/// `00:00:01,999`.
pub fn format_srt_timecode(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = decompose(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

// =============================================================================
// Editor Timecodes (HH:MM:SS.mmm)
// =============================================================================

/// Parses an editor field timecode (e.g. `0:01:23.4`, `00:01:23`) into seconds.
///
/// Hours may have any number of digits; the millisecond group is optional
/// and may be 1-3 digits (right-padded with zeros, so `.4` means 400 ms).
pub fn parse_editor_timecode_strict(text: &str) -> ParseResult<TimeSec> {
    let trimmed = text.trim();
    let (hms, ms_field) = match trimmed.split_once('.') {
        Some((hms, ms)) => (hms, Some(ms)),
        None => (trimmed, None),
    };

    let fields: Vec<&str> = hms.split(':').collect();
    if fields.len() != 3 {
        return Err(ParseError::InvalidTimestamp(text.to_string()));
    }

    if fields[0].is_empty() || !fields[0].bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidTimestamp(text.to_string()));
    }
    let hours: u64 = fields[0]
        .parse()
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))?;
    let minutes = parse_fixed_digits(fields[1], 2)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;
    let seconds = parse_fixed_digits(fields[2], 2)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;

    let millis = match ms_field {
        Some(ms) => {
            if ms.is_empty() || ms.len() > 3 || !ms.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidTimestamp(text.to_string()));
            }
            let padded = format!("{:0<3}", ms);
            padded
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))?
        }
        None => 0,
    };

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

/// Lenient editor timecode parser: `0.0` on any mismatch.
pub fn parse_editor_timecode(text: &str) -> TimeSec {
    match parse_editor_timecode_strict(text) {
        Ok(sec) => sec,
        Err(err) => {
            debug!("Unparseable editor timecode, falling back to 0: {}", err);
            0.0
        }
    }
}

/// Formats seconds as an editor field timecode (`00:00:00.000`).
pub fn format_editor_timecode(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = decompose(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

// =============================================================================
// Shared Decomposition
// =============================================================================

/// Floor-truncates seconds into (hours, minutes, seconds, milliseconds).
fn decompose(seconds: TimeSec) -> (u64, u64, u64, u64) {
    let total_ms = (seconds * 1000.0 + MS_FLOOR_TOLERANCE).floor().max(0.0) as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    (hours, mins, secs, ms)
}

/// Parses a field of exactly `width` ASCII digits.
fn parse_fixed_digits(field: &str, width: usize) -> Option<u64> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

// =============================================================================
// Tests
// =============================================================================
