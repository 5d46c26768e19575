//! Cueline Error Definitions
//!
//! Defines error types used throughout the engine.
//!
//! The public editing surface favors silent degradation over raised errors
//! (a failed parse must not crash an interactive session), so these errors
//! only surface from the strict parser layer; the lenient wrappers catch
//! them, log, and fall back.

use thiserror::Error;

/// Parse error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid cue block: {0}")]
    InvalidBlock(String),

    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Parse result type
pub type ParseResult<T> = Result<T, ParseError>;
