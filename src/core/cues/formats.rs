//! Cue Import and Export Formats
//!
//! Parses SRT (SubRip) documents and plain newline-delimited text into cue
//! lists, and serializes a cue list back to SRT.
//!
//! # SRT Format
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! First cue text
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second cue text
//! with multiple lines
//! ```
//!
//! Parsing is deliberately forgiving: blocks that don't fit the shape above
//! are dropped rather than failing the whole import, and the SRT index lines
//! are ignored entirely — cue ids are re-counted from 1 in document order.

use tracing::debug;

use crate::core::{CueId, ParseError, ParseResult, TimeSec};

use super::models::Cue;
use super::timecode::{format_srt_timecode, parse_srt_timecode};

/// Slot width assigned to each line of a plain-text import
pub const DEFAULT_SECONDS_PER_LINE: TimeSec = 5.0;

// =============================================================================
// SRT Parsing
// =============================================================================

/// Parses an SRT document into a list of cues.
///
/// Carriage returns are stripped, the document is split on blank-line
/// boundaries, and each block contributes one cue if it has a `-->`
/// timecode line (preceded by an optional pure-numeric index line, which
/// is ignored). Malformed blocks are skipped.
pub fn parse_srt(content: &str) -> Vec<Cue> {
    let normalized = content.replace('\r', "");
    let mut cues = Vec::new();
    let mut next_id: CueId = 1;

    for block in normalized.split("\n\n") {
        match parse_block(block) {
            Ok((start, end, text)) => {
                cues.push(Cue::new(next_id, start, end, &text));
                next_id += 1;
            }
            Err(err) => {
                if !block.trim().is_empty() {
                    debug!("Skipping SRT block: {}", err);
                }
            }
        }
    }

    cues
}

/// Parses one blank-line-delimited block into `(start, end, text)`.
fn parse_block(block: &str) -> ParseResult<(TimeSec, TimeSec, String)> {
    let lines: Vec<&str> = block.split('\n').filter(|l| !l.is_empty()).collect();
    if lines.len() < 2 {
        return Err(ParseError::MissingData("cue block lines".to_string()));
    }

    // The first line may be an SRT index number; its value is ignored.
    let time_line_idx = usize::from(is_index_line(lines[0]));
    let time_line = lines[time_line_idx];

    let times: Vec<&str> = time_line.split("-->").collect();
    if times.len() != 2 {
        return Err(ParseError::InvalidBlock(format!(
            "expected 'start --> end', got {:?}",
            time_line
        )));
    }

    let start = parse_srt_timecode(times[0]);
    let end = parse_srt_timecode(times[1]);
    let text = lines[time_line_idx + 1..].join("\n");
    Ok((start, end, text))
}

/// Returns true for a pure-numeric (non-empty) index line.
fn is_index_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// SRT Export
// =============================================================================

/// Serializes cues to an SRT document.
///
/// Blocks are re-numbered sequentially from 1 regardless of stored ids,
/// and each block is terminated by a blank line.
pub fn export_srt(cues: &[Cue]) -> String {
    cues.iter()
        .enumerate()
        .map(|(i, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_srt_timecode(cue.start),
                format_srt_timecode(cue.end),
                cue.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Plain-Text Import
// =============================================================================

/// Converts newline-delimited text into an evenly-spaced cue sequence.
///
/// Each non-blank line becomes a cue occupying the next
/// `seconds_per_line`-wide slot; blank lines produce no cue and do not
/// consume a slot.
pub fn parse_plain_text(text: &str, seconds_per_line: TimeSec) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut next_id: CueId = 1;
    let mut t: TimeSec = 0.0;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        cues.push(Cue::new(next_id, t, t + seconds_per_line, line));
        next_id += 1;
        t += seconds_per_line;
    }

    cues
}

// =============================================================================
// Tests
// =============================================================================
