//! Error types for MBO replay.
//!
//! Two failure domains exist: a malformed input record ([`DecodeError`]),
//! which callers drop and move past, and an unreadable source
//! ([`ReplayError::Io`]), which ends the replay.

use thiserror::Error;

/// Result type alias for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Why a single input record could not be decoded.
///
/// Decoding is all-or-nothing: a record that yields one of these never
/// reaches the book.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Wrong number of comma-separated fields
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A numeric column did not parse
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Action or side column is not exactly one character
    #[error("{field} must be a single character, got {value:?}")]
    InvalidChar { field: &'static str, value: String },

    /// Single character that is not a known action
    #[error("unknown action: {0:?}")]
    UnknownAction(char),

    /// Single character that is not a known side
    #[error("unknown side: {0:?}")]
    UnknownSide(char),

    /// Price literal that is not a decimal or does not fit the fixed-point range
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    /// Line bytes are not UTF-8
    #[error("record is not valid UTF-8")]
    InvalidUtf8,
}

/// Main error type for replay operations.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Input or output stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed record surfaced to a caller that asked for it
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Rejected configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReplayError {
    /// Create a configuration error from any string-like type.
    pub fn config(msg: impl Into<String>) -> Self {
        ReplayError::InvalidConfig(msg.into())
    }
}
