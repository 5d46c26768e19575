//! Cue Track Module
//!
//! The cue domain: the timed-cue data model, the SRT and plain-text codecs,
//! the structural editing operations, and active-cue tracking against
//! playback time.

pub mod formats;
pub mod models;
pub mod store;
pub mod timecode;
pub mod tracker;

pub use formats::{export_srt, parse_plain_text, parse_srt, DEFAULT_SECONDS_PER_LINE};
pub use models::{Cue, CuePatch};
pub use tracker::{active_cue, ActiveCueTracker, SCROLL_GRACE_SEC};
