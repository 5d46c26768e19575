//! Cueline Core Library
//!
//! Subtitle timeline editing engine for a video subtitle authoring tool.
//! This library contains the in-memory cue model, the SRT/plain-text
//! codecs, the structural editing operations, active-cue tracking against
//! playback time, and the configurable keybinding dispatch logic.
//!
//! The surrounding shell (file pickers, the video element, DOM rendering
//! and scrolling) is an external collaborator: it feeds key events and
//! playback time in, and applies the [`core::editor::Effect`]s that come
//! back out.

pub mod core;
