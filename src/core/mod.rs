//! Cueline Core Engine
//!
//! Core editing engine module.
//! Handles the cue list, codecs, keybinding dispatch, and editor session state.

pub mod cues;
pub mod editor;
pub mod input;
pub mod settings;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
