//! Cueline Core Type Definitions
//!
//! Defines fundamental types used throughout the engine.

// =============================================================================
// ID Types
// =============================================================================

/// Cue unique identifier.
///
/// Integer, monotonically assigned (`max existing + 1`), never reused within
/// a session. Independent of SRT index numbers, which are regenerated on export.
pub type CueId = u64;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Rounds a time to millisecond precision.
///
/// Every time written into a cue by an editing operation goes through this,
/// so stored boundaries survive an SRT round-trip exactly.
pub fn round_ms(time_sec: TimeSec) -> TimeSec {
    (time_sec * 1000.0).round() / 1000.0
}

// =============================================================================
// Export Constants
// =============================================================================

/// File name offered for the exported SRT byte stream
pub const EXPORT_FILE_NAME: &str = "subtitles.srt";

// =============================================================================
// Tests
// =============================================================================
