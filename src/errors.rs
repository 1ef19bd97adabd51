use std::path::PathBuf;

use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Every failure the mapper can report. Nothing is swallowed inside the core;
// only the `find_*_or` accessors turn these into defaults.
#[derive(Debug, Error)]
pub enum MapperError {
    // Malformed JSON, or a top-level value that is not an object
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("array index {index} is out of range (len {len})")]
    IndexOutOfRange { index: i64, len: usize },

    // Non-integer token used where a sequence index was required
    #[error("invalid array index: {0}")]
    InvalidIndex(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("value at '{path}' is {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("comparison {op} not supported for {found} values")]
    UnsupportedComparison { op: &'static str, found: &'static str },

    #[error("unsupported type for numeric comparison: {0}")]
    InvalidNumericType(&'static str),

    #[error("invalid condition: {0}")]
    InvalidCondition(String),
}

// Type alias for results that use `MapperError` as the error type
pub type Result<T> = std::result::Result<T, MapperError>;
